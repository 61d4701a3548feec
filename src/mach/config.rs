use super::stack::DEFAULT_STACK_LIMIT;

/// ## Machine limits and host settings
///
/// Built once by the host and handed to `Runtime` and `Builtins`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Instructions per `execute` slice.
    pub cycles: usize,
    /// Instruction ceiling for one `call_function` re-entry.
    pub call_limit: usize,
    /// Call stack depth before overflow.
    pub stack_limit: usize,
    pub screen_width: i64,
    pub screen_height: i64,
    /// Fixed seed for `random`, entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            cycles: 5000,
            call_limit: 1000,
            stack_limit: DEFAULT_STACK_LIMIT,
            screen_width: 800,
            screen_height: 600,
            seed: None,
        }
    }
}
