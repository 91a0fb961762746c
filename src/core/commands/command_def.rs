// src/core/commands/command_def.rs

//! The `define_commands!` macro. Given `(Variant, Type, module, "name")`
//! tuples it generates the `Command` enum, name-based parsing and the
//! `CommandExt` dispatch.

macro_rules! define_commands {
    ($(($variant:ident, $ty:ident, $module:ident, $name:literal)),* $(,)?) => {
        /// A parsed command, ready to execute.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Command {
            $($variant($module::$ty),)*
        }

        impl Command {
            /// Parses the arguments of the command registered under `name`.
            /// `args` excludes the command name itself.
            pub fn parse_named(name: &str, args: &[RespFrame]) -> Result<Self, KeyGateError> {
                match name {
                    $($name => Ok(Command::$variant($module::$ty::parse(args)?)),)*
                    other => Err(KeyGateError::UnknownCommand(other.to_string())),
                }
            }
        }

        #[async_trait]
        impl CommandExt for Command {
            async fn execute<'a>(
                &self,
                ctx: &mut ExecutionContext<'a>,
            ) -> Result<RespValue, KeyGateError> {
                match self {
                    $(Command::$variant(cmd) => cmd.execute(ctx).await,)*
                }
            }
        }
    };
}
