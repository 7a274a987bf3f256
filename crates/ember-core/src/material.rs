//! Material component for the ray tracer and raster passes
//!
//! The parameter set follows Disney's principled BRDF. Every parameter is a
//! scalar in `[0, 1]`. Callers own validation: the ECS stores whatever it is
//! given, so run [`Material::validate`] before attaching a material.

use std::fmt;
use std::ops::RangeInclusive;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Errors raised while addressing or validating material parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaterialError {
    #[error("unknown material field index {0}, expected 0..{count}", count = MaterialField::COUNT)]
    UnknownField(u32),

    #[error("material {field} value {value} is outside [0, 1]")]
    OutOfRange { field: MaterialField, value: f32 },
}

/// Addressable material parameters, in GPU layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialField {
    Metallic,
    Subsurface,
    Specular,
    Roughness,
    SpecularTint,
    Anisotropic,
    Sheen,
    SheenTint,
    Clearcoat,
    ClearcoatGloss,
}

impl MaterialField {
    pub const COUNT: usize = 10;

    pub const ALL: [MaterialField; Self::COUNT] = [
        MaterialField::Metallic,
        MaterialField::Subsurface,
        MaterialField::Specular,
        MaterialField::Roughness,
        MaterialField::SpecularTint,
        MaterialField::Anisotropic,
        MaterialField::Sheen,
        MaterialField::SheenTint,
        MaterialField::Clearcoat,
        MaterialField::ClearcoatGloss,
    ];

    /// Display name used by the editor panels.
    pub fn name(self) -> &'static str {
        match self {
            MaterialField::Metallic => "Metallic",
            MaterialField::Subsurface => "Subsurface",
            MaterialField::Specular => "Specular",
            MaterialField::Roughness => "Roughness",
            MaterialField::SpecularTint => "SpecularTint",
            MaterialField::Anisotropic => "Anisotropic",
            MaterialField::Sheen => "Sheen",
            MaterialField::SheenTint => "SheenTint",
            MaterialField::Clearcoat => "Clearcoat",
            MaterialField::ClearcoatGloss => "ClearcoatGloss",
        }
    }

    /// Accepted value range.
    pub fn range(self) -> RangeInclusive<f32> {
        0.0..=1.0
    }

    /// Position of this field in [`MaterialField::ALL`].
    pub fn index(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for MaterialField {
    type Error = MaterialError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(MaterialError::UnknownField(index))
    }
}

impl fmt::Display for MaterialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Principled BRDF parameter block.
///
/// `#[repr(C)]` and [`Pod`] so the ray tracer can copy it straight into a
/// storage buffer. Fields are tightly packed scalars, no implicit padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub metallic: f32,
    pub subsurface: f32,
    pub specular: f32,
    pub roughness: f32,
    pub specular_tint: f32,
    pub anisotropic: f32,
    pub sheen: f32,
    pub sheen_tint: f32,
    pub clearcoat: f32,
    pub clearcoat_gloss: f32,
}

impl Material {
    /// A rough dielectric, the look used for untextured debug geometry.
    pub fn diffuse(roughness: f32) -> Self {
        Self {
            roughness,
            specular: 0.5,
            ..Default::default()
        }
    }

    /// A polished metal.
    pub fn metal(roughness: f32) -> Self {
        Self {
            metallic: 1.0,
            roughness,
            specular: 0.5,
            ..Default::default()
        }
    }

    pub fn field(&self, field: MaterialField) -> f32 {
        match field {
            MaterialField::Metallic => self.metallic,
            MaterialField::Subsurface => self.subsurface,
            MaterialField::Specular => self.specular,
            MaterialField::Roughness => self.roughness,
            MaterialField::SpecularTint => self.specular_tint,
            MaterialField::Anisotropic => self.anisotropic,
            MaterialField::Sheen => self.sheen,
            MaterialField::SheenTint => self.sheen_tint,
            MaterialField::Clearcoat => self.clearcoat,
            MaterialField::ClearcoatGloss => self.clearcoat_gloss,
        }
    }

    /// Mutable access to one parameter. Writes through this are not range-checked.
    pub fn field_mut(&mut self, field: MaterialField) -> &mut f32 {
        match field {
            MaterialField::Metallic => &mut self.metallic,
            MaterialField::Subsurface => &mut self.subsurface,
            MaterialField::Specular => &mut self.specular,
            MaterialField::Roughness => &mut self.roughness,
            MaterialField::SpecularTint => &mut self.specular_tint,
            MaterialField::Anisotropic => &mut self.anisotropic,
            MaterialField::Sheen => &mut self.sheen,
            MaterialField::SheenTint => &mut self.sheen_tint,
            MaterialField::Clearcoat => &mut self.clearcoat,
            MaterialField::ClearcoatGloss => &mut self.clearcoat_gloss,
        }
    }

    /// Set a parameter, rejecting values outside its range.
    pub fn set(&mut self, field: MaterialField, value: f32) -> Result<(), MaterialError> {
        if !field.range().contains(&value) {
            return Err(MaterialError::OutOfRange { field, value });
        }
        *self.field_mut(field) = value;
        Ok(())
    }

    /// Check every parameter, reporting the first one out of range.
    ///
    /// NaN is never in range.
    pub fn validate(&self) -> Result<(), MaterialError> {
        for field in MaterialField::ALL {
            let value = self.field(field);
            if !field.range().contains(&value) {
                return Err(MaterialError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Raw bytes for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
