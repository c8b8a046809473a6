pub mod features;
pub mod genbank;
pub mod protein_index;
pub mod synthesize;

pub use features::{FeatureAttributes, FeatureGroups, FeatureRecord};
pub use protein_index::ProteinIndex;
pub use synthesize::{write_datafiles, FeatureInputs, FeatureOutputs, SynthesisSummary};
