use crate::error::ModeSwitchError;

pub fn get_exit_code(error: &ModeSwitchError) -> i32 {
    match error {
        ModeSwitchError::InvalidMode(_)
        | ModeSwitchError::InvalidConfig(_)
        | ModeSwitchError::ConfigError(_) => 2,

        ModeSwitchError::AlreadyPending
        | ModeSwitchError::SwitchInProgress
        | ModeSwitchError::TestInProgress => 16, // EBUSY

        ModeSwitchError::NotReady => 3,

        ModeSwitchError::SignalClear { source, .. } | ModeSwitchError::Io(source)
            if source.kind() == std::io::ErrorKind::PermissionDenied =>
        {
            13
        }

        _ => 1,
    }
}
