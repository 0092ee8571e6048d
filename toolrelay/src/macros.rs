/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use toolrelay::{Role, relay_msg};
///
/// let message = relay_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
/// ```
#[macro_export]
macro_rules! relay_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::System, $content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::User, $content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::Assistant, $content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use toolrelay::{Role, relay_messages};
///
/// let messages = relay_messages![
///     system => "You can call tools.",
///     user => "What time is it?",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! relay_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::relay_msg!($role => $content)),+]
    };
}
