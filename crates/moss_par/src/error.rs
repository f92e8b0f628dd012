//! Place-and-route failure classification.

use thiserror::Error;

/// A user-caused place-and-route failure.
///
/// These are reportable conditions, not bugs: the design does not fit the
/// device, or the search finished without finding a routable placement.
/// Internal invariant violations (e.g. mating across incompatible labels)
/// are not represented here; they panic, because continuing would corrupt
/// the mating.
///
/// The `Display` renderings are the user-facing messages the engine prints
/// to stderr, prefixed with `ERROR: `.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceAndRouteError {
    /// More netlist nodes of some label than the device has sites of that label.
    #[error(
        "Design is too big for the device \
         (netlist has {required} nodes with label {label}, device only has {available})"
    )]
    CapacityExceeded {
        /// The site-type label that overflowed.
        label: u32,
        /// Number of netlist nodes carrying the label.
        required: u32,
        /// Number of device sites carrying the label.
        available: u32,
    },

    /// The netlist uses a label the device does not have at all.
    #[error("Netlist contains a node with label {netlist_max}, largest in device is {device_max}")]
    LabelOutOfRange {
        /// Largest label in the netlist.
        netlist_max: u32,
        /// Largest label in the device.
        device_max: u32,
    },

    /// The optimization loop finished with unrouted nets remaining.
    #[error("Some nets could not be completely routed!")]
    Unroutable {
        /// Number of netlist edges left without a routing resource.
        unrouted: usize,
    },
}
