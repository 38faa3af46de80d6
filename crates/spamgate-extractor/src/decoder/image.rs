use super::Decoder;
use crate::DecodeError;
use spamgate_domain::traits::SpamClassifier;
use spamgate_domain::Attachment;

/// Reads text out of images with the classifier's vision model
pub struct ImageDecoder<'a, C> {
    classifier: Option<&'a C>,
}

impl<'a, C: SpamClassifier> ImageDecoder<'a, C> {
    /// Create a decoder; without a classifier every image is declined
    pub fn new(classifier: Option<&'a C>) -> Self {
        Self { classifier }
    }
}

impl<C: SpamClassifier> Decoder for ImageDecoder<'_, C> {
    fn name(&self) -> &'static str {
        "image"
    }

    fn decode(&self, attachment: &Attachment, bytes: &[u8]) -> Result<String, DecodeError> {
        let classifier = self.classifier.ok_or(DecodeError::NoClassifier)?;

        let text = classifier
            .extract_text(bytes, &attachment.mime_type.to_ascii_lowercase())
            .map_err(|e| DecodeError::Classifier(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(DecodeError::EmptyOutput(self.name()));
        }
        Ok(text)
    }
}
