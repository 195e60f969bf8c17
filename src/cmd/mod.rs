pub mod analyze;
pub mod batch;
pub mod chart;
pub mod scan;

use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// Case-insensitive substring of the item name.
    #[arg(short, long)]
    pub item: Option<String>,

    /// Zero-based record index, as listed by `scan`.
    #[arg(long, conflicts_with = "item")]
    pub index: Option<usize>,
}
