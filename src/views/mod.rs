//! Screen controllers. Each one owns the state of a single screen and turns
//! API results into a snapshot the renderer can draw.

pub mod dashboard;
pub mod journal;
pub mod remote;
pub mod stats;

pub use dashboard::{ChartPoint, DashboardData, DashboardSnapshot, DashboardView};
pub use journal::{JournalSnapshot, JournalView, ListState, SubmitStatus};
pub use remote::{Remote, RequestSequencer, Settled, Ticket};
pub use stats::{Goals, MacroProgress, StatsSnapshot, StatsSummary, StatsView};
