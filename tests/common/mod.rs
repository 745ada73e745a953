use std::fs;
use std::path::PathBuf;

/// Writes `source` to a scratch file under `target/` and returns its path.
/// `ERR` scenarios need a real file on disk because they exercise the
/// `rlox` binary end to end, including its process exit code.
pub fn scratch_script(name: &str, source: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
    fs::create_dir_all(&dir).expect("create scratch directory");
    let path = dir.join(format!("{name}.lox"));
    fs::write(&path, source).expect("write scratch script");
    path
}

/// Declares one integration test that runs inline Lox source and asserts on
/// its outcome.
///
/// `is OK` runs the source in-process through [`rlox::run_source`] and
/// compares captured stdout against the expected lines.
/// `is ERR` shells out to the built `rlox` binary, so the process exit code
/// is exercised too, and asserts the expected lines appear on stderr.
#[macro_export]
macro_rules! tests {
    ($name:ident : $source:expr => OK $($expected:expr),* $(,)?) => {
        #[test]
        fn $name() {
            let mut expected = vec![$($expected),*];
            let expected = if expected.is_empty() {
                String::new()
            } else {
                expected.push("");
                expected.join("\n")
            };

            let mut output = Vec::new();
            let reporter = rlox::run_source($source, &mut output);

            assert!(!reporter.had_error(), "unexpected compile error for {}", stringify!($name));
            assert!(!reporter.had_runtime_error(), "unexpected runtime error for {}", stringify!($name));
            assert_eq!(expected, std::str::from_utf8(&output).unwrap());
        }
    };

    ($name:ident : $source:expr => ERR $($expected:expr),+ $(,)?) => {
        #[test]
        fn $name() {
            use assert_cmd::Command;

            let path = $crate::common::scratch_script(stringify!($name), $source);
            let expected = vec![$($expected),+].join("\n");

            Command::cargo_bin("rlox").unwrap()
                .arg(&path)
                .assert()
                .stderr(format!("{expected}\n"))
                .failure();
        }
    };
}
