//! The message interface the transaction consumes.

use super::Address;

/// An email message ready for submission.
///
/// Message construction (headers, MIME parts, encodings) happens elsewhere;
/// the session only needs the envelope data and the finished text. The text
/// is transmitted verbatim as the DATA payload, so it must already be
/// CRLF-delimited RFC 5322 content.
pub trait Message {
    /// Envelope sender, used in `MAIL FROM`.
    fn sender(&self) -> &Address;

    /// Primary recipients, visited first in the RCPT sequence.
    fn to(&self) -> &[Address];

    /// Carbon-copy recipients, visited after `to`.
    fn cc(&self) -> &[Address];

    /// Blind-carbon-copy recipients, visited last.
    fn bcc(&self) -> &[Address];

    /// The fully formatted message (headers + body), sent as-is.
    fn text(&self) -> &str;
}

/// A plain carrier for a pre-formatted message and its envelope.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    from: Address,
    to: Vec<Address>,
    cc: Vec<Address>,
    bcc: Vec<Address>,
    text: String,
}

impl OutgoingMessage {
    /// Creates a new outgoing message with no recipients yet.
    #[must_use]
    pub fn new(from: Address, text: impl Into<String>) -> Self {
        Self {
            from,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            text: text.into(),
        }
    }

    /// Adds a recipient.
    #[must_use]
    pub fn with_to(mut self, recipient: Address) -> Self {
        self.to.push(recipient);
        self
    }

    /// Adds a CC recipient.
    #[must_use]
    pub fn with_cc(mut self, recipient: Address) -> Self {
        self.cc.push(recipient);
        self
    }

    /// Adds a BCC recipient.
    #[must_use]
    pub fn with_bcc(mut self, recipient: Address) -> Self {
        self.bcc.push(recipient);
        self
    }
}

impl Message for OutgoingMessage {
    fn sender(&self) -> &Address {
        &self.from
    }

    fn to(&self) -> &[Address] {
        &self.to
    }

    fn cc(&self) -> &[Address] {
        &self.cc
    }

    fn bcc(&self) -> &[Address] {
        &self.bcc
    }

    fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    #[test]
    fn builder_keeps_recipient_order() {
        let msg = OutgoingMessage::new(addr("from@example.com"), "Subject: x\r\n\r\nbody\r\n")
            .with_to(addr("a@example.com"))
            .with_to(addr("b@example.com"))
            .with_cc(addr("c@example.com"))
            .with_bcc(addr("d@example.com"));

        assert_eq!(msg.sender().as_str(), "from@example.com");
        let to: Vec<&str> = msg.to().iter().map(Address::as_str).collect();
        assert_eq!(to, vec!["a@example.com", "b@example.com"]);
        assert_eq!(msg.cc().len(), 1);
        assert_eq!(msg.bcc().len(), 1);
    }

    #[test]
    fn text_is_untouched() {
        let text = "Subject: hi\r\n\r\nline1\r\n.leading dot stays\r\n";
        let msg = OutgoingMessage::new(addr("from@example.com"), text);
        assert_eq!(msg.text(), text);
    }
}
