//! Closed families of models selected by a discriminator field.

use super::field::Presence;
use super::model::FieldReader;
use crate::{DecodeError, DescriptorError};

/// Decoder for one member of a variant family.
pub type MemberDecoder<T> = fn(&mut FieldReader<'_>) -> Result<T, DecodeError>;

/// One discriminator value and the decoder it routes to.
pub struct VariantMember<T: 'static> {
    pub tag: &'static str,
    pub decode: MemberDecoder<T>,
}

/// The member table of a variant family.
///
/// Several tags may route to the same decoder when members share a shape.
/// Each member decodes the complete object, discriminator included.
pub struct VariantTable<T: 'static> {
    discriminator: &'static str,
    members: &'static [VariantMember<T>],
}

impl<T> VariantTable<T> {
    pub const fn new(discriminator: &'static str, members: &'static [VariantMember<T>]) -> Self {
        Self {
            discriminator,
            members,
        }
    }

    pub fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|member| member.tag)
    }

    /// Checks that every tag appears once.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        for (index, member) in self.members.iter().enumerate() {
            if self.members[..index].iter().any(|m| m.tag == member.tag) {
                return Err(DescriptorError::DuplicateVariantTag {
                    discriminator: self.discriminator,
                    tag: member.tag,
                });
            }
        }
        Ok(())
    }

    /// Reads the discriminator and delegates to exactly one member.
    ///
    /// An unknown tag is a hard failure; there is no fallback member.
    pub fn decode(&self, fields: &mut FieldReader<'_>) -> Result<T, DecodeError> {
        let tag: String = match fields.presence(self.discriminator)? {
            Presence::Present(tag) => tag,
            Presence::Absent | Presence::Null => {
                return Err(DecodeError::MissingDiscriminator {
                    field: self.discriminator.to_owned(),
                });
            }
        };

        let member = self
            .members
            .iter()
            .find(|member| member.tag == tag)
            .ok_or_else(|| DecodeError::UnrecognizedVariant {
                field: self.discriminator.to_owned(),
                value: tag.clone(),
            })?;

        tracing::trace!(discriminator = self.discriminator, tag = %tag, "decoding variant");
        (member.decode)(fields)
    }
}
