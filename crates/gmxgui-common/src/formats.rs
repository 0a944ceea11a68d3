//! Input file formats understood by GROMACS. Only used for labelling; file contents are never read.

use serde::{Deserialize, Serialize};

pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdb", ".gro", ".mol2", ".sdf", ".itp", ".top", ".mdp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Structure,
    Ligand,
    Topology,
    Parameters,
    Other,
}

impl FileKind {
    /// Classify a type tag such as `.pdb`. Case-insensitive; the leading dot is optional.
    pub fn from_type_tag(tag: &str) -> Self {
        let ext = tag.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "pdb" | "gro"  => FileKind::Structure,
            "mol2" | "sdf" => FileKind::Ligand,
            "top" | "itp"  => FileKind::Topology,
            "mdp"          => FileKind::Parameters,
            _              => FileKind::Other,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Structure  => "🧬",
            FileKind::Ligand     => "💊",
            FileKind::Topology   => "📋",
            FileKind::Parameters => "⚙️",
            FileKind::Other      => "📄",
        }
    }
}

/// Extract the type tag (`.pdb`) from a file name. Returns an empty string when there is no extension.
pub fn type_tag_for(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => format!(".{}", ext.to_ascii_lowercase()),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(FileKind::from_type_tag(".pdb"), FileKind::Structure);
        assert_eq!(FileKind::from_type_tag("MOL2"), FileKind::Ligand);
        assert_eq!(FileKind::from_type_tag(".itp"), FileKind::Topology);
        assert_eq!(FileKind::from_type_tag(".xyz"), FileKind::Other);
    }

    #[test]
    fn test_type_tag_for() {
        assert_eq!(type_tag_for("protein.PDB"), ".pdb");
        assert_eq!(type_tag_for("topology.top"), ".top");
        assert_eq!(type_tag_for("README"), "");
        assert_eq!(type_tag_for(".hidden"), "");
    }
}
