//! gmxgui-monitoring: reachability of the external simulation API.

pub mod connectivity;

pub use connectivity::{ConnectivityMonitor, ConnectivityState, ConnectivityStatus, HealthProbe, MonitorHandle};
