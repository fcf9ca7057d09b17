#[cfg(test)]
mod samples {
    use std::fs;
    use std::path::{Path, PathBuf};

    use shaderlab::parsing;

    fn shaders_in(dir: &Path) -> Vec<PathBuf> {
        assert!(dir.exists(), "{:?} directory missing", dir);

        let entries = fs::read_dir(dir).expect("Failed to read directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some("shader")
            {
                files.push(path);
            }
        }

        assert!(!files.is_empty(), "No .shader files found in {:?}", dir);
        files
    }

    #[test]
    fn ensure_samples_parse() {
        let files = shaders_in(Path::new("tests/samples/"));

        let mut failures = Vec::new();

        for file in &files {
            let content = parsing::load(&file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

            match parsing::parse(&content) {
                Ok(_) => {}
                Err(e) => {
                    println!("File {:?} failed to parse: {}", file, e);
                    failures.push(file.clone());
                }
            }
        }

        if !failures.is_empty() {
            panic!(
                "Sample files should parse successfully, but {} files failed",
                failures.len()
            );
        }
    }

    #[test]
    fn ensure_broken_fail() {
        let files = shaders_in(Path::new("tests/broken/"));

        let mut unexpected_successes = Vec::new();

        for file in &files {
            let content = parsing::load(&file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

            match parsing::parse(&content) {
                Ok(_) => {
                    println!("File {:?} unexpectedly parsed successfully", file);
                    unexpected_successes.push(file.clone());
                }
                Err(_) => {}
            }
        }

        if !unexpected_successes.is_empty() {
            panic!(
                "Broken files should not parse successfully, but {} files passed",
                unexpected_successes.len()
            );
        }
    }

    #[test]
    fn missing_file_reported() {
        let error = parsing::load(Path::new("tests/samples/Nonexistent.shader")).unwrap_err();
        assert_eq!(error.problem, "File not found");
    }
}
