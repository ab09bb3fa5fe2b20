//! Crate-wide error type. Every parsing, lookup and rate-generation failure
//! is funneled into ChemNetError so callers can match on the concrete cause.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChemNetError {
    #[error("cannot parse species name: \"{token}\" in \"{name}\"")]
    SpeciesParse { name: String, token: String },
    #[error("malformed {format} record ({reason}): \"{record}\"")]
    RecordParse {
        format: String,
        reason: String,
        record: String,
    },
    #[error("unknown reaction type code \"{code}\" in {format} format")]
    UnknownTypeCode { format: String, code: String },
    #[error("reaction type {rtype} does not match the {process} process")]
    TypeMismatch { rtype: String, process: String },
    #[error("the {process} rate is not implemented in the {model} grain model")]
    NotImplementedInModel { model: String, process: String },
    #[error("rate of reaction type {0} is not implemented")]
    UnimplementedRate(String),
    #[error("reaction type {0} requires a grain model, none was provided")]
    GrainModelRequired(String),
    #[error("cannot find the binding energy of {0}")]
    MissingBindingEnergy(String),
    #[error("no species containing element {0} in the list")]
    MissingElement(String),
    #[error("{0} is not a surface species")]
    NotSurfaceSpecies(String),
    #[error("repeated definitions in elements and pseudo elements: {0:?}")]
    DuplicateElements(Vec<String>),
    #[error("malformed rate expression: {0}")]
    RateExpression(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
