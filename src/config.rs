/// How `(if ...)` treats the branch it does not select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionalMode {
    /// Both branches run before one is picked, so side effects in the
    /// untaken branch still happen.
    #[default]
    Eager,
    /// Only the selected branch runs.
    ShortCircuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub conditional: ConditionalMode,
}

impl Options {
    pub fn short_circuit() -> Self {
        Options {
            conditional: ConditionalMode::ShortCircuit,
        }
    }
}
