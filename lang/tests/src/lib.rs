pub use unminify_driver::Safety;

pub mod utils {
    use pretty_assertions::assert_eq;
    use std::{path::PathBuf, sync::Arc};
    use unminify_driver::{Conf, Safety, unminify_source};
    use unminify_surface::textual::parse_str;
    use unminify_utils::span::FileInfo;

    pub fn fixture_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn run(source: &str, info: &FileInfo, safety: Safety) -> String {
        match unminify_source(source, info, &Conf::new(safety)) {
            | Ok(out) => out,
            | Err(err) => {
                eprintln!("{}", err);
                panic!("Error unminifying `{}` at {}", info.display_path(), safety);
            }
        }
    }

    /// Runs `<name>.js` at `safety` and checks the output reparses, is a fixpoint, and matches
    /// `<name>.<safety>.js` when that file exists.
    pub fn wrapper_fixture(name: &str, safety: Safety) {
        let path = fixture_dir().join(format!("{}.js", name));
        let source = std::fs::read_to_string(&path).unwrap();
        let info = FileInfo::new(&source, Some(Arc::new(path)));
        let out = run(&source, &info, safety);

        if let Err(err) = parse_str(&out) {
            panic!("output of `{}` at {} does not reparse: {}\n{}", name, safety, err, out);
        }
        let again = run(&out, &FileInfo::new(&out, None), safety);
        assert_eq!(out, again, "`{}` at {} is not a fixpoint", name, safety);

        let expected = fixture_dir().join(format!("{}.{}.js", name, safety));
        if expected.exists() {
            let expected = std::fs::read_to_string(expected).unwrap();
            assert_eq!(out, expected.trim_end());
        }
    }
}

/// One test per safety level for the fixture `fixtures/<file>.js`.
#[macro_export]
macro_rules! fixture {
    ($name:ident, $file:expr) => {
        mod $name {
            use $crate::Safety;

            #[test]
            fn useless() {
                $crate::utils::wrapper_fixture($file, Safety::Useless);
            }
            #[test]
            fn safe() {
                $crate::utils::wrapper_fixture($file, Safety::Safe);
            }
            #[test]
            fn mostly_safe() {
                $crate::utils::wrapper_fixture($file, Safety::MostlySafe);
            }
            #[test]
            fn r#unsafe() {
                $crate::utils::wrapper_fixture($file, Safety::Unsafe);
            }
            #[test]
            fn wildly_unsafe() {
                $crate::utils::wrapper_fixture($file, Safety::WildlyUnsafe);
            }
        }
    };
}
