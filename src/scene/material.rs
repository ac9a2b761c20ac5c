use std::fmt;

pub type Rgba = [f32; 4];

/// Illumination model with diffuse and specular terms.
pub const ILLUM_DIFFUSE_SPECULAR: u32 = 2;
/// Illumination model that also uses ambient reflectance.
pub const ILLUM_AMBIENT: u32 = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Rgba,
    pub diffuse: Rgba,
    pub specular: Rgba,
    pub emission: Rgba,
    pub shininess: f32,
    pub optical_density: f32,
    pub dissolve: f32,
    pub illumination_model: u32,
    pub texture_path: Option<String>,
}

impl Material {
    pub fn new(name: &str) -> Self {
        Material {
            name: name.to_string(),
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            emission: [0.0, 0.0, 0.0, 1.0],
            shininess: 65.0,
            optical_density: 1.0,
            dissolve: 1.0,
            illumination_model: ILLUM_DIFFUSE_SPECULAR,
            texture_path: None,
        }
    }

    /// Applies the ambient rule: a positive ambient colour selects model 3,
    /// anything else selects model 2 with full ambient reflectance.
    pub fn derive_illumination(&mut self) {
        if self.ambient[..3].iter().any(|&channel| channel > 0.0) {
            self.illumination_model = ILLUM_AMBIENT;
        } else {
            self.illumination_model = ILLUM_DIFFUSE_SPECULAR;
            self.ambient = [1.0, 1.0, 1.0, 1.0];
        }
    }
}

fn write_rgba(f: &mut fmt::Formatter<'_>, label: &str, rgba: &Rgba) -> fmt::Result {
    writeln!(
        f,
        "{}: [{:.2} {:.2} {:.2} {:.2}]",
        label, rgba[0], rgba[1], rgba[2], rgba[3]
    )
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Shininess: {}", self.shininess)?;
        writeln!(f, "Refractive index: {}", self.optical_density)?;
        writeln!(f, "Dissolve factor: {}", self.dissolve)?;
        writeln!(
            f,
            "Texture file: {}",
            self.texture_path.as_deref().unwrap_or("-")
        )?;
        writeln!(f, "Illumination model: {}", self.illumination_model)?;
        write_rgba(f, "Ambient", &self.ambient)?;
        write_rgba(f, "Diffuse", &self.diffuse)?;
        write_rgba(f, "Specular", &self.specular)?;
        write_rgba(f, "Emission", &self.emission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ambient_selects_model_two_with_full_ambient() {
        let mut material = Material::new("matte");
        material.ambient = [0.0, 0.0, 0.0, 0.0];
        material.derive_illumination();

        assert_eq!(material.illumination_model, ILLUM_DIFFUSE_SPECULAR);
        assert_eq!(material.ambient, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn positive_ambient_selects_model_three() {
        let mut material = Material::new("metal");
        material.ambient = [0.2, 0.0, 0.0, 0.0];
        material.derive_illumination();

        assert_eq!(material.illumination_model, ILLUM_AMBIENT);
        assert_eq!(material.ambient, [0.2, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn ambient_alpha_does_not_count() {
        let mut material = Material::new("alpha_only");
        material.ambient = [0.0, 0.0, 0.0, 1.0];
        material.derive_illumination();

        assert_eq!(material.illumination_model, ILLUM_DIFFUSE_SPECULAR);
    }

    #[test]
    fn display_lists_every_field() {
        let mut material = Material::new("brick");
        material.texture_path = Some("brick.bmp".to_string());
        let text = material.to_string();

        assert!(text.contains("Name: brick"));
        assert!(text.contains("Texture file: brick.bmp"));
        assert!(text.contains("Diffuse: [0.80 0.80 0.80 1.00]"));
    }
}
