// ── Source references ──
//
// Pipelines and streams name their input with a single signed integer.
// The sign picks the referenced kind and the magnitude (minus one) picks
// the position. The two conventions below are mirror images of each
// other and must stay that way: the producer writes them as-is.
//
//   field     |  0   |  v > 0            |  v < 0
//   ----------+------+-------------------+-------------------
//   Pipeline  | None | Camera(v - 1)     | Pipeline(-v - 1)
//   Stream    | None | Pipeline(v - 1)   | Camera(-v - 1)

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::EntityKind;

/// Decoded form of a source-index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceReference {
    #[default]
    None,
    Camera(usize),
    Pipeline(usize),
}

impl SourceReference {
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Kind of entity referenced, if any.
    pub fn kind(self) -> Option<EntityKind> {
        match self {
            Self::None => None,
            Self::Camera(_) => Some(EntityKind::Camera),
            Self::Pipeline(_) => Some(EntityKind::Pipeline),
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Camera(i) | Self::Pipeline(i) => Some(i),
        }
    }
}

/// Which sign convention a source-index field follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceField {
    /// A pipeline's input: positive is a camera.
    Pipeline,
    /// A stream's input: positive is a pipeline.
    Stream,
}

impl SourceField {
    /// Decode a raw field value. Total: every integer has a meaning, even
    /// if the position it names is outside the current cache.
    pub fn decode(self, raw: i32) -> SourceReference {
        if raw == 0 {
            return SourceReference::None;
        }
        let raw = i64::from(raw);
        let positive = raw > 0;
        let magnitude = if positive { raw - 1 } else { -raw - 1 };
        // |i32::MIN| - 1 == i32::MAX, so the magnitude always fits.
        let index = usize::try_from(magnitude).unwrap_or(usize::MAX);

        match (self, positive) {
            (Self::Pipeline, true) | (Self::Stream, false) => SourceReference::Camera(index),
            (Self::Pipeline, false) | (Self::Stream, true) => SourceReference::Pipeline(index),
        }
    }

    /// Inverse of [`decode`](Self::decode).
    pub fn encode(self, reference: SourceReference) -> Result<i32, CoreError> {
        let (kind, index, positive) = match (self, reference) {
            (_, SourceReference::None) => return Ok(0),
            (Self::Pipeline, SourceReference::Camera(i)) => (EntityKind::Camera, i, true),
            (Self::Pipeline, SourceReference::Pipeline(i)) => (EntityKind::Pipeline, i, false),
            (Self::Stream, SourceReference::Pipeline(i)) => (EntityKind::Pipeline, i, true),
            (Self::Stream, SourceReference::Camera(i)) => (EntityKind::Camera, i, false),
        };

        let out_of_range = || CoreError::SourceIndexOutOfRange { kind, index };
        let magnitude = i64::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .ok_or_else(out_of_range)?;
        let raw = if positive { magnitude } else { -magnitude };
        i32::try_from(raw).map_err(|_| out_of_range())
    }
}

impl TryFrom<EntityKind> for SourceField {
    type Error = CoreError;

    fn try_from(kind: EntityKind) -> Result<Self, Self::Error> {
        match kind {
            EntityKind::Pipeline => Ok(Self::Pipeline),
            EntityKind::Stream => Ok(Self::Stream),
            EntityKind::Camera | EntityKind::Target => Err(CoreError::NoSourceField { kind }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_none_for_both_fields() {
        assert_eq!(SourceField::Pipeline.decode(0), SourceReference::None);
        assert_eq!(SourceField::Stream.decode(0), SourceReference::None);
        assert_eq!(SourceField::Pipeline.encode(SourceReference::None).unwrap(), 0);
        assert_eq!(SourceField::Stream.encode(SourceReference::None).unwrap(), 0);
    }

    #[test]
    fn pipeline_field_positive_is_camera() {
        assert_eq!(SourceField::Pipeline.decode(1), SourceReference::Camera(0));
        assert_eq!(SourceField::Pipeline.decode(3), SourceReference::Camera(2));
        assert_eq!(SourceField::Pipeline.decode(-1), SourceReference::Pipeline(0));
        assert_eq!(SourceField::Pipeline.decode(-4), SourceReference::Pipeline(3));
    }

    #[test]
    fn stream_field_positive_is_pipeline() {
        assert_eq!(SourceField::Stream.decode(1), SourceReference::Pipeline(0));
        assert_eq!(SourceField::Stream.decode(3), SourceReference::Pipeline(2));
        assert_eq!(SourceField::Stream.decode(-1), SourceReference::Camera(0));
        assert_eq!(SourceField::Stream.decode(-4), SourceReference::Camera(3));
    }

    #[test]
    fn same_raw_value_means_different_things_per_field() {
        for raw in [-7, -1, 1, 7] {
            let as_pipeline = SourceField::Pipeline.decode(raw);
            let as_stream = SourceField::Stream.decode(raw);
            assert_ne!(as_pipeline.kind(), as_stream.kind(), "raw {raw}");
            assert_eq!(as_pipeline.index(), as_stream.index(), "raw {raw}");
        }
    }

    #[test]
    fn encode_inverts_decode_for_non_negative_indices() {
        for field in [SourceField::Pipeline, SourceField::Stream] {
            for i in [0usize, 1, 2, 17, 1000] {
                for reference in [SourceReference::Camera(i), SourceReference::Pipeline(i)] {
                    let raw = field.encode(reference).unwrap();
                    assert_eq!(field.decode(raw), reference, "{field:?} {reference:?}");
                }
            }
        }
    }

    #[test]
    fn decode_inverts_encode_across_i32_extremes() {
        for field in [SourceField::Pipeline, SourceField::Stream] {
            for raw in [i32::MIN, i32::MIN + 1, -1, 0, 1, i32::MAX - 1, i32::MAX] {
                assert_eq!(field.encode(field.decode(raw)).unwrap(), raw, "{field:?} {raw}");
            }
        }
    }

    #[test]
    fn unrepresentable_index_is_reported() {
        let max = usize::try_from(i32::MAX).unwrap();
        // Negative side reaches one further than the positive side.
        assert!(SourceField::Pipeline.encode(SourceReference::Pipeline(max)).is_ok());
        assert!(matches!(
            SourceField::Pipeline.encode(SourceReference::Camera(max)),
            Err(CoreError::SourceIndexOutOfRange {
                kind: EntityKind::Camera,
                ..
            })
        ));
        assert!(SourceField::Stream.encode(SourceReference::Pipeline(usize::MAX)).is_err());
    }

    #[test]
    fn only_pipelines_and_streams_carry_a_source_field() {
        assert_eq!(
            SourceField::try_from(EntityKind::Pipeline).unwrap(),
            SourceField::Pipeline
        );
        assert_eq!(SourceField::try_from(EntityKind::Stream).unwrap(), SourceField::Stream);
        assert!(SourceField::try_from(EntityKind::Camera).is_err());
        assert!(SourceField::try_from(EntityKind::Target).is_err());
    }
}
