//! Folding decoded blocks into the output tag dictionary.

use std::collections::BTreeMap;

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;

use crate::block::{Application, PictureEntry, VorbisComment};
use crate::diag::Diagnostics;

/// Reserved key overriding the join string used when a comment key repeats.
pub const SEPARATOR_KEY: &str = "SEPARATOR";
/// Reserved key holding the encoder vendor string.
pub const VENDOR_KEY: &str = "VENDOR";

const DEFAULT_SEPARATOR: &str = "/";

/// All tag-bearing output of one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagSet {
    /// Folded comment dictionary. Keys are uppercased at insertion; a
    /// repeated key appends its new value behind the current `SEPARATOR`
    /// value (default `/`).
    pub comments: IndexMap<String, String>,
    /// Accepted `KEY=VALUE` entries, verbatim and in encounter order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub raw_comments: Vec<String>,
    /// Latest picture per picture-type code.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pictures: BTreeMap<u32, PictureEntry>,
    /// Every picture block, in encounter order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_pictures: Vec<PictureEntry>,
    /// Application payloads keyed by the decimal form of the 4-byte id.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub applications: BTreeMap<String, Bytes>,
    /// Rendered cue-sheet lines, regenerated whole on each CUESHEET block.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cuesheet: Vec<String>,
}

impl TagSet {
    /// Folds one comment block into the dictionary.
    ///
    /// Entries with no `=` or with empty content are skipped with a
    /// diagnostic; everything else lands in both the folded dictionary and
    /// the raw list.
    pub fn add_comments(&mut self, block: &VorbisComment, diag: &mut dyn Diagnostics) {
        if !block.vendor.is_empty() {
            self.comments
                .insert(VENDOR_KEY.to_string(), block.vendor.clone());
        }
        for entry in &block.entries {
            if entry.is_empty() {
                diag.warn("empty comment, skipping");
                continue;
            }
            let Some((key, value)) = entry.split_once('=') else {
                diag.warn(&format!("comment {entry:?} missing '=', skipping"));
                continue;
            };
            self.raw_comments.push(entry.clone());
            let key = key.to_uppercase();
            let merged = self.comments.get(&key).map(|existing| {
                let join = self
                    .comments
                    .get(SEPARATOR_KEY)
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_SEPARATOR);
                format!("{existing}{join}{value}")
            });
            match merged {
                Some(merged) => self.comments.insert(key, merged),
                None => self.comments.insert(key, value.to_string()),
            };
        }
    }

    /// Records one picture block: last write wins per type code, while the
    /// encounter-order list keeps every block.
    pub fn add_picture(&mut self, picture: PictureEntry) {
        self.pictures.insert(picture.picture_type, picture.clone());
        self.all_pictures.push(picture);
    }

    pub fn add_application(&mut self, app: &Application) {
        self.applications
            .insert(app.id_decimal.clone(), app.data.clone());
    }

    pub fn set_cuesheet(&mut self, lines: Vec<String>) {
        self.cuesheet = lines;
    }
}
