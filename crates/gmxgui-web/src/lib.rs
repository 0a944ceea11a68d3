//! gmxgui-web: Web GUI for the GROMACS GUI Platform
//! Provides the simulation project dashboard with:
//!   - Project list and status counters
//!   - Mock file upload
//!   - Force field selection and simulation parameters
//!   - Simulation control and analysis summary
//!   - Backend connectivity banner
//!   - JSON API and live event stream

pub mod router;
pub mod handlers;
pub mod state;
pub mod sse;
pub mod server;
