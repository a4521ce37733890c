//! Output generation: the PDF report, terminal cards, JSON, and the pipeline diagram.
//!
//! # Submodules
//!
//! - [`report`]: builds the report layout (header + per-article blocks)
//! - [`pdf`]: paints a layout into PDF bytes
//! - [`cards`]: plain-text cards for the terminal
//! - [`json`]: writes a pipeline result as JSON
//! - [`graph`]: exports the stage topology as DOT
//!
//! # Output Structure
//!
//! ```text
//! pdf_output_dir/
//! └── news_summary_electric_vehicles_20240305_143007.pdf
//!
//! json_output_dir/
//! └── news_summary_electric_vehicles_20240305_143007.json
//!
//! graph_output_dir/
//! └── news_workflow.dot
//! ```

pub mod cards;
pub mod graph;
pub mod json;
pub mod pdf;
pub mod report;
