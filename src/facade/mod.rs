pub mod pipeline;

pub use pipeline::{Coverage, PipelineOutput, ProcedureInference, SchemaPipeline};
