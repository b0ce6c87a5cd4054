/// Generic notice shown after the endpoint accepts the answers.
pub const SUCCESS_NOTICE: &str = "Thanks! Your answers were submitted.";
/// Generic notice shown when a submission fails.
pub const FAILURE_NOTICE: &str = "Sorry, your answers could not be submitted.";

/// Blocking acknowledgment channel to the user.
///
/// Implementations return once the user has seen the message.
pub trait Notifier {
    fn alert(&self, message: &str);
}
