//! Invitation email rendering.

use keyhub_core::traits::InvitationEmail;

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Subject line of an invitation email.
pub fn subject(email: &InvitationEmail) -> String {
    format!(
        "{} invited you to view group: {}",
        email.inviter_name, email.group_name
    )
}

/// HTML body of an invitation email.
pub fn render_html(email: &InvitationEmail) -> String {
    let inviter = escape_html(&email.inviter_name);
    let inviter_email = escape_html(&email.inviter_email);
    let group = escape_html(&email.group_name);
    let accept = escape_html(&email.accept_url);
    let reject = escape_html(&email.reject_url);

    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: -apple-system, Segoe UI, Helvetica, Arial, sans-serif; color: #111827;">
    <h2>You have been invited to a group</h2>
    <p><strong>{inviter}</strong> ({inviter_email}) invited you to view the group <strong>{group}</strong>.</p>
    <p>
      <a href="{accept}" style="display: inline-block; padding: 10px 18px; background: #2563eb; color: #ffffff; text-decoration: none; border-radius: 6px;">Accept invitation</a>
    </p>
    <p>Not interested? <a href="{reject}">Decline this invitation</a>.</p>
    <p style="font-size: 12px; color: #6b7280;">If you did not expect this email you can ignore it.</p>
  </body>
</html>
"#
    )
}
