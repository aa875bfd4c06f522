pub mod ics;

pub use ics::IcsExportAdapter;
