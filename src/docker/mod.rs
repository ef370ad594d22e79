// Container tool invocation: command execution, diagnostics, interrupts.

pub mod run;
pub mod signal;
pub mod types;

pub use run::{CommandRunner, SystemRunner, command_line};
pub use signal::install_interrupt_handler;
pub use types::{ExecOutcome, InterruptFlag, ToolCommand};
