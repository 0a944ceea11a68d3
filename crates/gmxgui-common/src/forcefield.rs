//! Static force-field catalog offered on the configure screen.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForceField {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const FORCEFIELDS: &[ForceField] = &[
    ForceField {
        id: "amber99sb-ildn",
        label: "AMBER99SB-ILDN",
        description: "Protein force field with improved dihedral parameters",
    },
    ForceField {
        id: "charmm36-jul2022",
        label: "CHARMM36",
        description: "Latest CHARMM36 all-atom force field",
    },
    ForceField {
        id: "gromos54a7",
        label: "GROMOS 54A7",
        description: "United-atom force field",
    },
    ForceField {
        id: "oplsaa",
        label: "OPLS-AA",
        description: "All-atom optimized potentials for liquid simulations",
    },
    ForceField {
        id: "amber14sb",
        label: "AMBER14SB",
        description: "AMBER14SB protein force field",
    },
];

/// Look up a catalog entry by identifier.
pub fn find(id: &str) -> Option<&'static ForceField> {
    FORCEFIELDS.iter().find(|ff| ff.id == id)
}

/// Display label for an identifier, falling back to the raw id for entries outside the catalog.
pub fn label_for(id: &str) -> &str {
    find(id).map(|ff| ff.label).unwrap_or(id)
}
