//! Hand-assembled `multipart/form-data` body for the notification
//! service's `sendPhoto` endpoint.
//!
//! The wire shape is fixed: `chat_id` and `caption` text fields followed by
//! the `photo` binary field (`alert.jpg`, `image/jpeg`), separated by a
//! fixed boundary. The advertised Content-Length must equal the bytes
//! actually written or the remote end hangs or rejects the request, so the
//! length is computed from the same blocks the encoder emits.

/// Fixed boundary token. Only one connection is ever open at a time, so
/// uniqueness across runs buys nothing.
pub const BOUNDARY: &str = "----WardenCamBoundary";

pub struct PhotoForm {
    chat_id: String,
    caption: String,
}

impl PhotoForm {
    pub fn new(chat_id: &str, caption: &str) -> Self {
        Self {
            chat_id: chat_id.to_owned(),
            caption: caption.to_owned(),
        }
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    /// Everything before the raw image bytes: both text fields plus the
    /// photo part headers.
    fn preamble(&self) -> String {
        format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"chat_id\"\r\n\r\n\
             {chat_id}\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"caption\"\r\n\r\n\
             {caption}\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"photo\"; filename=\"alert.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\n",
            b = BOUNDARY,
            chat_id = self.chat_id,
            caption = self.caption,
        )
    }

    fn epilogue() -> String {
        format!("\r\n--{BOUNDARY}--\r\n")
    }

    /// Exact byte length of the encoded body for an image of `image_len`
    /// bytes. Counts bytes, not chars: the default caption contains
    /// multi-byte UTF-8.
    pub fn content_length(&self, image_len: usize) -> usize {
        self.preamble().len() + image_len + Self::epilogue().len()
    }

    /// Materialize the body: preamble, raw image bytes, closing boundary.
    pub fn encode(&self, image: &[u8]) -> Vec<u8> {
        let preamble = self.preamble();
        let epilogue = Self::epilogue();
        let mut body = Vec::with_capacity(preamble.len() + image.len() + epilogue.len());
        body.extend_from_slice(preamble.as_bytes());
        body.extend_from_slice(image);
        body.extend_from_slice(epilogue.as_bytes());
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CAPTION;

    const CHAT_ID: &str = "7318781359";

    #[test]
    fn content_length_matches_encoded_bytes_exactly() {
        let form = PhotoForm::new(CHAT_ID, DEFAULT_CAPTION);
        for image_len in [0usize, 1, 1024, 60_000] {
            let image = vec![0xA5u8; image_len];
            assert_eq!(
                form.content_length(image_len),
                form.encode(&image).len(),
                "image_len = {image_len}"
            );
        }
    }

    #[test]
    fn caption_length_is_counted_in_bytes_not_chars() {
        let form = PhotoForm::new(CHAT_ID, DEFAULT_CAPTION);
        // "⚠️" alone is six bytes of UTF-8; a char-counted length would
        // undershoot and the endpoint would hang waiting for the rest.
        assert!(DEFAULT_CAPTION.len() > DEFAULT_CAPTION.chars().count());
        assert_eq!(form.content_length(10), form.encode(&[0u8; 10]).len());
    }

    #[test]
    fn body_reproduces_the_wire_shape_byte_for_byte() {
        let form = PhotoForm::new("42", "boom");
        let body = form.encode(&[0xDE, 0xAD]);

        let expected_head = "------WardenCamBoundary\r\n\
             Content-Disposition: form-data; name=\"chat_id\"\r\n\r\n\
             42\r\n\
             ------WardenCamBoundary\r\n\
             Content-Disposition: form-data; name=\"caption\"\r\n\r\n\
             boom\r\n\
             ------WardenCamBoundary\r\n\
             Content-Disposition: form-data; name=\"photo\"; filename=\"alert.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\n";
        let expected_tail = "\r\n------WardenCamBoundary--\r\n";

        assert!(body.starts_with(expected_head.as_bytes()));
        assert!(body.ends_with(expected_tail.as_bytes()));
        assert_eq!(
            &body[expected_head.len()..body.len() - expected_tail.len()],
            &[0xDE, 0xAD]
        );
    }

    #[test]
    fn parts_appear_in_protocol_order() {
        let form = PhotoForm::new(CHAT_ID, "caption text");
        let body = String::from_utf8_lossy(&form.encode(b"")).into_owned();
        let chat = body.find("name=\"chat_id\"").unwrap();
        let caption = body.find("name=\"caption\"").unwrap();
        let photo = body.find("name=\"photo\"").unwrap();
        assert!(chat < caption && caption < photo);
    }

    #[test]
    fn content_type_advertises_the_boundary() {
        let form = PhotoForm::new(CHAT_ID, "x");
        assert_eq!(
            form.content_type(),
            "multipart/form-data; boundary=----WardenCamBoundary"
        );
    }
}
