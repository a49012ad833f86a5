//! Seeded demo datasets: overlapping iris-, wine- and cancer-like classes
//! with uniform noise.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::table::{Column, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Iris,
    Wine,
    Cancer,
}

/// One generated feature: `base + shift * offset + noise * (u - 0.5)` with
/// `u` uniform on `[0, 1)`, plus `class_bias.1` for rows of class
/// `class_bias.0`.
struct Feature {
    name: &'static str,
    base: f64,
    shift: f64,
    noise: f64,
    class_bias: Option<(&'static str, f64)>,
}

impl Feature {
    const fn biased(self, class: &'static str, amount: f64) -> Self {
        Feature {
            class_bias: Some((class, amount)),
            ..self
        }
    }

    fn bias_for(&self, label: &str) -> f64 {
        match self.class_bias {
            Some((class, amount)) if class == label => amount,
            _ => 0.0,
        }
    }
}

const fn feature(name: &'static str, base: f64, shift: f64, noise: f64) -> Feature {
    Feature { name, base, shift, noise, class_bias: None }
}

static IRIS: [Feature; 4] = [
    feature("Sepal_L", 5.8, 1.0, 2.5),
    feature("Sepal_W", 3.0, -0.2, 2.0),
    feature("Petal_L", 3.7, 1.5, 2.5),
    feature("Petal_W", 1.2, 0.8, 1.5),
];

static WINE: [Feature; 5] = [
    feature("Alcohol", 13.0, 1.0, 2.0),
    feature("MalicAcid", 2.0, 0.0, 3.0),
    feature("Ash", 2.3, 0.0, 1.0),
    feature("Alkalinity", 19.0, -1.0, 8.0),
    feature("Magnesium", 100.0, 5.0, 40.0),
];

static CANCER: [Feature; 5] = [
    feature("Radius", 15.0, 1.0, 8.0),
    feature("Texture", 20.0, 1.0, 10.0),
    feature("Perimeter", 90.0, 3.0, 30.0),
    feature("Area", 700.0, 50.0, 300.0),
    feature("Smoothness", 0.1, 0.0, 0.04).biased("Malignant", 0.01),
];

/// (label, rows, class offset)
type ClassSpec = (&'static str, usize, f64);

impl Preset {
    pub fn target(self) -> &'static str {
        match self {
            Preset::Iris => "Species",
            Preset::Wine => "Label",
            Preset::Cancer => "Diagnosis",
        }
    }

    fn features(self) -> &'static [Feature] {
        match self {
            Preset::Iris => &IRIS,
            Preset::Wine => &WINE,
            Preset::Cancer => &CANCER,
        }
    }

    fn classes(self) -> &'static [ClassSpec] {
        match self {
            Preset::Iris => &[("Setosa", 50, -0.8), ("Versicolor", 50, 0.0), ("Virginica", 50, 0.8)],
            Preset::Wine => &[("Class_1", 59, 0.8), ("Class_2", 71, 0.0), ("Class_3", 48, -0.8)],
            Preset::Cancer => &[("Malignant", 100, 1.0), ("Benign", 100, -1.0)],
        }
    }

    pub fn generate(self, seed: u64) -> Result<Table> {
        let mut rng = StdRng::seed_from_u64(seed);
        let features = self.features();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); features.len()];
        let mut labels = Vec::new();

        for &(label, rows, offset) in self.classes() {
            for _ in 0..rows {
                for (column, f) in values.iter_mut().zip(features) {
                    let noise = (rng.gen::<f64>() - 0.5) * f.noise;
                    column.push(f.base + f.shift * offset + noise + f.bias_for(label));
                }
                labels.push(label.to_string());
            }
        }

        let mut columns: Vec<(String, Column)> = features.iter()
            .zip(values)
            .map(|(f, v)| (f.name.to_string(), Column::Numeric(v)))
            .collect();
        columns.push((self.target().to_string(), Column::Categorical(labels)));
        Table::from_columns(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_shapes() {
        let iris = Preset::Iris.generate(1).unwrap();
        assert_eq!(iris.len(), 150);
        assert_eq!(iris.numeric_columns(), vec!["Sepal_L", "Sepal_W", "Petal_L", "Petal_W"]);
        assert_eq!(iris.categorical_columns(), vec!["Species"]);

        assert_eq!(Preset::Wine.generate(1).unwrap().len(), 178);
        assert_eq!(Preset::Cancer.generate(1).unwrap().len(), 200);
    }

    #[test]
    fn test_class_bias_only_hits_its_class() {
        let smoothness = &CANCER[4];

        assert_eq!(smoothness.bias_for("Malignant"), 0.01);
        assert_eq!(smoothness.bias_for("Benign"), 0.0);
        assert!(IRIS.iter().all(|f| f.class_bias.is_none()));

        let cancer = Preset::Cancer.generate(5).unwrap();
        let labels = cancer.text("Diagnosis").unwrap();
        let values = cancer.numeric("Smoothness").unwrap();
        for (label, value) in labels.iter().zip(values) {
            let centre = if label == "Malignant" { 0.11 } else { 0.1 };
            assert!((value - centre).abs() <= 0.02 + 1e-12);
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = Preset::Wine.generate(42).unwrap();
        let b = Preset::Wine.generate(42).unwrap();
        let c = Preset::Wine.generate(43).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_values_stay_within_noise_band() {
        let iris = Preset::Iris.generate(7).unwrap();
        let species = iris.text("Species").unwrap();
        let petal = iris.numeric("Petal_L").unwrap();

        for (label, value) in species.iter().zip(petal) {
            let centre = match label.as_str() {
                "Setosa" => 3.7 - 1.2,
                "Versicolor" => 3.7,
                _ => 3.7 + 1.2,
            };
            assert!((value - centre).abs() <= 1.25 + 1e-9);
        }
    }
}
