use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

use crate::domain::{AliasGroup, AliasRegistry};

/// Load the alias registry from a JSON array of groups, e.g.
///
/// ```json
/// [{ "preferredName": "Jace", "names": ["Jace", "Jace B"], "secondaryIds": ["Jace#12345"] }]
/// ```
///
/// Without a configured path the registry is empty and every new name becomes its own group.
pub fn load_alias_registry(path: Option<&Path>) -> Result<AliasRegistry> {
    let Some(path) = path else {
        return Ok(AliasRegistry::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read alias registry {}", path.display()))?;
    let groups: Vec<AliasGroup> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse alias registry {}", path.display()))?;

    info!("Loaded {} alias groups from {}", groups.len(), path.display());
    Ok(AliasRegistry::new(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PartialName;

    #[test]
    fn no_path_means_empty_registry() {
        assert!(load_alias_registry(None).unwrap().is_empty());
    }

    #[test]
    fn reads_groups_from_json() {
        let path = std::env::temp_dir().join(format!("aliases-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"preferredName":"Jace","names":["Jace","Jace B"],"secondaryIds":["Jace#1"]},
                {"preferredName":"Liliana","names":["Lili"]}]"#,
        )
        .unwrap();

        let registry = load_alias_registry(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(registry.len(), 2);
        let group = registry
            .resolve(&PartialName::new("Lili", Some("Lili#9")))
            .unwrap();
        assert_eq!(group.preferred_name, "Liliana");
        assert!(group.secondary_ids.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("aliases-bad-{}.json", std::process::id()));
        fs::write(&path, "{not json").unwrap();

        let result = load_alias_registry(Some(&path));
        fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }
}
