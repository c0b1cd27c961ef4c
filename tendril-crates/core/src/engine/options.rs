/// Options which influence the order in which the engine runs propagators.
///
/// Neither option changes the fixpoint which is reached, only the work it takes to get there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub priority_mode: PriorityMode,
    pub activation_order: ActivationOrder,
}

/// Determines the bucket in which a scheduled propagator is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PriorityMode {
    /// Always the priority class of the propagator.
    Static,
    /// The number of uninstantiated variables in the scope when that is at most 3, so that
    /// propagators which are almost decided run before expensive ones; otherwise the priority
    /// class.
    #[default]
    Dynamic,
}

/// The order in which newly posted propagators receive their first propagation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ActivationOrder {
    /// The order in which the constraints were posted.
    #[default]
    Posting,
    /// Cheapest first: by priority class, then arity, then id.
    Priority,
}

impl std::fmt::Display for PriorityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityMode::Static => write!(f, "static"),
            PriorityMode::Dynamic => write!(f, "dynamic"),
        }
    }
}

impl std::fmt::Display for ActivationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivationOrder::Posting => write!(f, "posting"),
            ActivationOrder::Priority => write!(f, "priority"),
        }
    }
}
