use if_addrs::get_if_addrs;

/// Answers "is any network currently usable?".
///
/// The dispatcher only logs a negative answer; it never skips a send
/// because of it.
pub trait Connectivity: Send + Sync + 'static {
    fn is_network_available(&self) -> bool;
}

/// Checks the host's network interfaces. Any non-loopback interface counts
/// as connectivity; an enumeration failure counts as none.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemConnectivity;

impl Connectivity for SystemConnectivity {
    fn is_network_available(&self) -> bool {
        match get_if_addrs() {
            Ok(interfaces) => interfaces.iter().any(|i| !i.is_loopback()),
            Err(e) => {
                tracing::debug!(error = %e, "could not enumerate network interfaces");
                false
            }
        }
    }
}

/// Always reports connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_network_available(&self) -> bool {
        true
    }
}
