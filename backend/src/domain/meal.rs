//! Meal and plan vocabularies shared by memberships, attendance, menus and
//! polls.

vocabulary!(
    /// A single meal served by a mess.
    MealType, "meal type" {
        /// Midday meal.
        Lunch => "lunch",
        /// Evening meal.
        Dinner => "dinner",
    }
);

vocabulary!(
    /// Meals included in a membership plan.
    MealsPerDay, "meals per day" {
        /// Lunch only.
        Lunch => "lunch",
        /// Dinner only.
        Dinner => "dinner",
        /// Lunch and dinner.
        Both => "both",
    }
);

vocabulary!(
    /// Billing period of a membership.
    PlanType, "plan type" {
        /// One calendar month.
        Monthly => "monthly",
        /// Three calendar months.
        Quarterly => "quarterly",
        /// Thirty days.
        Custom => "custom",
    }
);

impl MealsPerDay {
    /// Whether the plan includes `meal`.
    ///
    /// # Examples
    /// ```
    /// use mess_backend::domain::{MealType, MealsPerDay};
    ///
    /// assert!(MealsPerDay::Both.covers(MealType::Dinner));
    /// assert!(!MealsPerDay::Lunch.covers(MealType::Dinner));
    /// ```
    #[must_use]
    pub const fn covers(self, meal: MealType) -> bool {
        matches!(
            (self, meal),
            (Self::Both, _) | (Self::Lunch, MealType::Lunch) | (Self::Dinner, MealType::Dinner)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MealsPerDay::Lunch, MealType::Lunch, true)]
    #[case(MealsPerDay::Lunch, MealType::Dinner, false)]
    #[case(MealsPerDay::Dinner, MealType::Lunch, false)]
    #[case(MealsPerDay::Dinner, MealType::Dinner, true)]
    #[case(MealsPerDay::Both, MealType::Lunch, true)]
    #[case(MealsPerDay::Both, MealType::Dinner, true)]
    fn covers_matches_plan(#[case] plan: MealsPerDay, #[case] meal: MealType, #[case] eligible: bool) {
        assert_eq!(plan.covers(meal), eligible);
    }

    #[rstest]
    fn parses_wire_names() {
        assert_eq!("quarterly".parse::<PlanType>(), Ok(PlanType::Quarterly));
        assert_eq!("both".parse::<MealsPerDay>(), Ok(MealsPerDay::Both));
    }

    #[rstest]
    fn rejects_unknown_values() {
        let err = "brunch".parse::<MealType>().expect_err("unknown meal");
        assert_eq!(err.kind(), "meal type");
        assert_eq!(err.to_string(), "unknown meal type: brunch");
    }
}
