//! Measure model and the fingerprint/boundary derivation over it.
//!
//! Two measures get the same [`MeasureFingerprint`] exactly when they would
//! print the same notation: same effective time signature, same beats, same
//! notes. Only the first voice takes part. Note order within a beat does not
//! matter.

use crate::adapter::SequenceAdapter;
use crate::error::{FoldError, Result};
use ahash::AHashSet as HashSet;
use serde::{Deserialize, Serialize};

/// Time signature used before any measure sets one.
pub const DEFAULT_SIGNATURE: [u32; 2] = [4, 4];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Measure {
    /// `[numerator, denominator]`; absent means "same as before"
    pub signature: Option<[u32; 2]>,
    pub voices: Vec<Voice>,
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Marker {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Voice {
    pub rest: bool,
    pub beats: Vec<Beat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Beat {
    /// `[numerator, denominator]` of a whole note
    pub duration: Option<[u32; 2]>,
    pub dots: u8,
    pub rest: bool,
    pub tuplet: Option<u32>,
    pub tuplet_start: bool,
    pub tuplet_stop: bool,
    pub palm_mute: bool,
    pub let_ring: bool,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Note {
    pub string: u32,
    pub fret: Option<u32>,
    pub rest: bool,
    pub tie: bool,
    pub hp: bool,
    pub slide: Option<String>,
    pub ghost: bool,
    pub dead: bool,
}

/// Canonical content of one measure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasureFingerprint {
    pub signature: [u32; 2],
    pub voice_rest: bool,
    pub beats: Vec<Beat>,
}

/// Why a measure is a hard boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    SignatureChange,
    Marker,
    TempoChange,
}

/// [`SequenceAdapter`] over a list of measures.
///
/// # Example
///
/// ```
/// use repeat_fold::{Measure, RepeatFolder, ScoreAdapter};
///
/// let riff: Vec<Measure> = serde_json::from_str(
///     r#"[
///         {"signature": [4, 4], "voices": [{"beats": [{"duration": [1, 1], "notes": [{"string": 6, "fret": 0}]}]}]},
///         {"voices": [{"beats": [{"duration": [1, 1], "notes": [{"string": 6, "fret": 3}]}]}]},
///         {"voices": [{"beats": [{"duration": [1, 1], "notes": [{"string": 6, "fret": 0}]}]}]},
///         {"voices": [{"beats": [{"duration": [1, 1], "notes": [{"string": 6, "fret": 3}]}]}]}
///     ]"#,
/// )
/// .unwrap();
///
/// let result = RepeatFolder::new().fold(&ScoreAdapter::new(&riff)).unwrap();
/// assert_eq!(result.folded_indices, vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct ScoreAdapter<'a> {
    measures: &'a [Measure],
    signatures: Vec<[u32; 2]>,
    signature_changed: Vec<bool>,
    tempo_changes: HashSet<usize>,
}

impl<'a> ScoreAdapter<'a> {
    pub fn new(measures: &'a [Measure]) -> Self {
        let mut current = DEFAULT_SIGNATURE;
        let mut signatures = Vec::with_capacity(measures.len());
        let mut signature_changed = Vec::with_capacity(measures.len());
        for measure in measures {
            let changed = match measure.signature {
                Some(signature) if signature != current => {
                    current = signature;
                    true
                }
                _ => false,
            };
            signatures.push(current);
            signature_changed.push(changed);
        }

        Self {
            measures,
            signatures,
            signature_changed,
            tempo_changes: HashSet::default(),
        }
    }

    /// Marks measures (0-based) where the tempo changes on the downbeat.
    pub fn with_tempo_changes<I: IntoIterator<Item = usize>>(mut self, measures: I) -> Self {
        self.tempo_changes.extend(measures);
        self
    }

    /// Time signature in force at the measure.
    pub fn signature(&self, position: usize) -> Option<[u32; 2]> {
        self.signatures.get(position).copied()
    }

    fn measure(&self, position: usize) -> Result<&'a Measure> {
        self.measures
            .get(position)
            .ok_or(FoldError::PositionOutOfRange {
                position,
                len: self.measures.len(),
            })
    }
}

impl<'a> SequenceAdapter for ScoreAdapter<'a> {
    type Fingerprint = MeasureFingerprint;
    type Boundary = BoundaryKind;

    fn len(&self) -> usize {
        self.measures.len()
    }

    fn fingerprint(&self, position: usize) -> Result<MeasureFingerprint> {
        let measure = self.measure(position)?;
        let signature = self.signatures[position];
        if signature.contains(&0) {
            return Err(FoldError::Fingerprint {
                position,
                reason: format!("invalid time signature {}/{}", signature[0], signature[1]),
            });
        }

        let voice = measure.voices.first();
        let voice_rest = voice.is_some_and(|v| v.rest);
        let mut beats: Vec<Beat> = if voice_rest {
            Vec::new()
        } else {
            voice.map(|v| v.beats.clone()).unwrap_or_default()
        };

        for (index, beat) in beats.iter_mut().enumerate() {
            match beat.duration {
                Some([n, d]) if n > 0 && d > 0 => {}
                _ => {
                    return Err(FoldError::Fingerprint {
                        position,
                        reason: format!("beat {} has no valid duration", index + 1),
                    })
                }
            }
            beat.notes.sort();
        }

        Ok(MeasureFingerprint {
            signature,
            voice_rest,
            beats,
        })
    }

    fn boundary(&self, position: usize) -> Result<Option<BoundaryKind>> {
        let measure = self.measure(position)?;
        if position == 0 {
            return Ok(None);
        }
        let kind = if self.signature_changed[position] {
            Some(BoundaryKind::SignatureChange)
        } else if measure.marker.as_ref().is_some_and(|m| !m.text.is_empty()) {
            Some(BoundaryKind::Marker)
        } else if self.tempo_changes.contains(&position) {
            Some(BoundaryKind::TempoChange)
        } else {
            None
        };
        Ok(kind)
    }

    fn debug_label(&self, position: usize) -> String {
        match self.measures.get(position).and_then(|m| m.marker.as_ref()) {
            Some(marker) if !marker.text.is_empty() => {
                format!("m{} ({})", position + 1, marker.text)
            }
            _ => format!("m{}", position + 1),
        }
    }
}
