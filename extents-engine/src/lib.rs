pub mod extents;

pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum ExtentsError {
        #[error("block `{block}` references itself through nested inserts")]
        CyclicBlockReference { block: String },
        #[error("block `{block}` exceeds the nesting limit of {limit} levels")]
        NestingTooDeep { block: String, limit: usize },
        #[error("entity with id {0} not found")]
        EntityNotFound(u64),
    }
}

pub use errors::ExtentsError;
pub use extents::{BlockLookup, DEFAULT_MAX_BLOCK_DEPTH, ExtentsComputer};
