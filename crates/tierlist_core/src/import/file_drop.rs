//! Conversion of dropped files into image things.

use crate::model::thing::NewThing;
use crate::store::command::DroppedFile;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Builds an image `NewThing` titled by file name with a data URL payload.
pub fn new_thing_from_file(file: &DroppedFile) -> NewThing {
    let mime_type = file
        .mime_type
        .as_deref()
        .map(str::trim)
        .filter(|mime| !mime.is_empty())
        .unwrap_or_else(|| guess_mime_type(&file.name));
    NewThing::image(file.name.clone(), to_data_url(mime_type, &file.bytes))
}

/// Encodes bytes as a base64 `data:` URL.
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

fn guess_mime_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("avif") => "image/avif",
        _ => FALLBACK_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::{new_thing_from_file, to_data_url};
    use crate::model::thing::ThingKind;
    use crate::store::command::DroppedFile;

    fn dropped(name: &str, mime_type: Option<&str>) -> DroppedFile {
        DroppedFile {
            name: name.to_string(),
            mime_type: mime_type.map(str::to_string),
            bytes: b"hi".to_vec(),
        }
    }

    #[test]
    fn data_url_is_base64_encoded() {
        assert_eq!(to_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn dropped_file_becomes_image_thing() {
        let thing = new_thing_from_file(&dropped("Cat.PNG", None));
        assert_eq!(thing.title, "Cat.PNG");
        assert_eq!(thing.kind, ThingKind::Image);
        assert_eq!(thing.payload.as_deref(), Some("data:image/png;base64,aGk="));
        assert_eq!(thing.place, None);
    }

    #[test]
    fn explicit_mime_type_wins_over_extension() {
        let thing = new_thing_from_file(&dropped("photo.bin", Some("image/jpeg")));
        assert!(thing
            .payload
            .is_some_and(|url| url.starts_with("data:image/jpeg;base64,")));

        let unknown = new_thing_from_file(&dropped("notes", None));
        assert!(unknown
            .payload
            .is_some_and(|url| url.starts_with("data:application/octet-stream;")));
    }
}
