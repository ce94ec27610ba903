pub mod scenario;
pub mod util;

pub use util::{load_roster, split_csv};
