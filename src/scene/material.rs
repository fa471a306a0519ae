/// Metallic-roughness surface parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    /// Material name from the asset, if any.
    pub name: Option<String>,
    /// Linear RGBA base color factor.
    pub base_color: [f32; 4],
    /// Metalness factor in `[0, 1]`.
    pub metalness: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0; 4],
            metalness: 1.0,
        }
    }
}

/// Constant-color surface that ignores lighting.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlitMaterial {
    /// Material name from the asset, if any.
    pub name: Option<String>,
    /// Linear RGBA color.
    pub base_color: [f32; 4],
}

/// Surface description of a primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Metallic-roughness material.
    Standard(StandardMaterial),
    /// `KHR_materials_unlit` material.
    Unlit(UnlitMaterial),
}

impl Default for Material {
    fn default() -> Self {
        Self::Standard(StandardMaterial::default())
    }
}

impl Material {
    /// Mutable metalness, for material kinds that have one.
    pub fn metalness_mut(&mut self) -> Option<&mut f32> {
        match self {
            Self::Standard(m) => Some(&mut m.metalness),
            Self::Unlit(_) => None,
        }
    }

    /// Metalness, for material kinds that have one.
    #[must_use]
    pub fn metalness(&self) -> Option<f32> {
        match self {
            Self::Standard(m) => Some(m.metalness),
            Self::Unlit(_) => None,
        }
    }

    /// Linear RGBA base color.
    #[must_use]
    pub fn base_color(&self) -> [f32; 4] {
        match self {
            Self::Standard(m) => m.base_color,
            Self::Unlit(m) => m.base_color,
        }
    }

    /// Whether the surface is shaded by scene lights.
    #[must_use]
    pub fn is_lit(&self) -> bool {
        matches!(self, Self::Standard(_))
    }

    /// Color the flat renderer shades with. Metals have no diffuse term, so
    /// the base color is scaled by `1 - metalness`.
    #[must_use]
    pub fn diffuse_color(&self) -> [f32; 4] {
        let [r, g, b, a] = self.base_color();
        let k = self.metalness().map_or(1.0, |m| 1.0 - m.clamp(0.0, 1.0));
        [r * k, g * k, b * k, a]
    }
}
