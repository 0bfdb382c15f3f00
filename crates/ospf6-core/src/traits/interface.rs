// # Area Interface Trait
//
// An OSPF interface attached to exactly one area. Its state machines,
// sockets and timers are its own; the area only forwards administrative
// state and tears it down.

/// Trait for interfaces attached to an area
pub trait AreaInterface: Send + Sync {
    /// Interface name, e.g. "eth0"
    fn name(&self) -> &str;

    /// Area has been administratively enabled
    fn enable(&mut self);

    /// Area has been administratively disabled
    fn disable(&mut self);

    /// Destroy the interface, releasing its timers and sockets
    fn delete(self: Box<Self>);
}
