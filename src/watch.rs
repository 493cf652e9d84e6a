use std::fs;

/// Test whether any running process name contains `name`, ignoring case.
///
/// Scans `/proc/<pid>/comm`, the kernel's task name (truncated to 15 bytes),
/// which is what the substring match runs against. Processes that disappear
/// mid-scan are skipped; an unreadable /proc reports the process as absent.
pub fn process_present(name: &str) -> bool {
    let needle = name.to_lowercase();

    let entries = match fs::read_dir("/proc") {
        Ok(entries) => entries,
        Err(_) => return false,
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        if file_name.to_string_lossy().parse::<u32>().is_err() {
            continue;
        }

        let Ok(comm) = fs::read_to_string(entry.path().join("comm")) else {
            continue;
        };

        if comm.trim_end().to_lowercase().contains(&needle) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_own_process() {
        let own = fs::read_to_string("/proc/self/comm").unwrap();
        assert!(process_present(own.trim_end()));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let own = fs::read_to_string("/proc/self/comm").unwrap();
        assert!(process_present(&own.trim_end().to_uppercase()));
    }

    #[test]
    fn test_matches_on_substring() {
        let own = fs::read_to_string("/proc/self/comm").unwrap();
        let own = own.trim_end();
        // Drop the first and last character to get a strict substring.
        if own.len() > 2 {
            assert!(process_present(&own[1..own.len() - 1]));
        }
    }

    #[test]
    fn test_absent_process_is_not_found() {
        assert!(!process_present("no-such-process-glowd-test"));
    }
}
