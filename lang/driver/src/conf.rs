use crate::{err::*, pipeline::Pipeline, safety::Safety};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings of one run, as read from a TOML file or assembled from flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Conf {
    pub safety: Safety,
    /// Registry names, run after the level's own transforms.
    pub additional_transforms: Vec<String>,
    /// Print width of the generated code.
    pub width: usize,
}

impl Default for Conf {
    fn default() -> Self {
        Conf { safety: Safety::Safe, additional_transforms: Vec::new(), width: 80 }
    }
}

impl Conf {
    pub fn new(safety: Safety) -> Self {
        Conf { safety, ..Conf::default() }
    }
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading configuration from `{}`", path.display());
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
    pub fn with_transforms<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.additional_transforms.extend(names.into_iter().map(|name| name.as_ref().to_string()));
        self
    }
    pub fn pipeline(&self) -> Result<Pipeline> {
        Pipeline::for_level(self.safety, &self.additional_transforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use unindent::unindent;

    #[test]
    fn defaults_fill_missing_keys() {
        assert_eq!(Conf::from_toml("").unwrap(), Conf::default());
        let conf = Conf::from_toml("safety = \"wildly-unsafe\"").unwrap();
        assert_eq!(conf, Conf::new(Safety::WildlyUnsafe));
    }

    #[test]
    fn full_file() {
        let text = unindent(
            r#"
            safety = "unsafe"
            additional_transforms = ["inline-constants"]
            width = 100
            "#,
        );
        let conf = Conf::from_toml(&text).unwrap();
        assert_eq!(conf.safety, Safety::Unsafe);
        assert_eq!(conf.additional_transforms, ["inline-constants"]);
        assert_eq!(conf.width, 100);
        assert_eq!(
            conf.pipeline().unwrap().names(),
            ["normalize", "restructure", "eliminate-dead", "eliminate-unused", "inline-constants"]
        );
    }

    #[test]
    fn bad_files_are_reported() {
        assert!(matches!(Conf::from_toml("safety = \"reckless\""), Err(UnminifyError::TomlError(_))));
        assert!(matches!(Conf::from_toml("colour = true"), Err(UnminifyError::TomlError(_))));
        let conf = Conf::default().with_transforms(["prettify"]);
        assert!(matches!(
            conf.pipeline(),
            Err(UnminifyError::ConfError(ConfError::UnknownTransform(name))) if name == "prettify"
        ));
    }
}
