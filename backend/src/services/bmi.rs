//! Body-mass-index calculation for the BMI page.

use crate::database::models::BmiResult;

/// `None` unless both measurements are finite and positive.
pub fn calculate(height_cm: f64, weight_kg: f64) -> Option<BmiResult> {
    if !(height_cm.is_finite() && weight_kg.is_finite()) || height_cm <= 0.0 || weight_kg <= 0.0 {
        return None;
    }

    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    let (category, tip) = if bmi < 18.5 {
        (
            "Underweight",
            "Consider eating more nutrient-dense foods and consult a nutritionist.",
        )
    } else if bmi < 25.0 {
        (
            "Normal Weight",
            "Great job! Maintain your healthy lifestyle with balanced meals and exercise.",
        )
    } else if bmi < 30.0 {
        (
            "Overweight",
            "Focus on portion control and regular physical activity.",
        )
    } else {
        (
            "Obese",
            "Consult a healthcare professional for a personalized weight management plan.",
        )
    };

    Some(BmiResult {
        bmi: (bmi * 10.0).round() / 10.0,
        category: category.to_string(),
        tip: tip.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorises_by_unrounded_value() {
        let normal = calculate(175.0, 70.0).unwrap();
        assert_eq!(normal.bmi, 22.9);
        assert_eq!(normal.category, "Normal Weight");

        assert_eq!(calculate(180.0, 55.0).unwrap().category, "Underweight");
        assert_eq!(calculate(170.0, 80.0).unwrap().category, "Overweight");
        assert_eq!(calculate(160.0, 90.0).unwrap().category, "Obese");
    }

    #[test]
    fn rejects_non_positive_measurements() {
        assert!(calculate(0.0, 70.0).is_none());
        assert!(calculate(175.0, -1.0).is_none());
        assert!(calculate(f64::NAN, 70.0).is_none());
    }
}
