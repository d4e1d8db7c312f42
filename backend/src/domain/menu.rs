//! Time-bounded menu announcements.
//!
//! A post is immutable once published and is live strictly before its expiry
//! time; nothing ever flips a stored flag.

use chrono::{DateTime, TimeDelta, Utc};

use super::{MealType, MenuPostId, MessId};

/// Expiry applied when the owner does not choose one.
pub const DEFAULT_MENU_TTL_HOURS: i64 = 6;
/// Maximum number of posts returned by the public feed.
pub const FEED_LIMIT: i64 = 50;

/// A published menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuPost {
    /// Record identifier.
    pub id: MenuPostId,
    /// Publishing mess.
    pub mess_id: MessId,
    /// Meal the menu is for.
    pub meal_type: MealType,
    /// Headline.
    pub title: String,
    /// Dishes in serving order.
    pub items: Vec<String>,
    /// Whether every dish is vegetarian.
    pub is_veg: bool,
    /// Optional price per plate.
    pub price: Option<f64>,
    /// Publication instant.
    pub visible_from: DateTime<Utc>,
    /// Instant the post stops being shown.
    pub expiry_time: DateTime<Utc>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl MenuPost {
    /// Whether the post is shown at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry_time
    }
}

/// Validation failures raised by [`MenuDraft::into_post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MenuValidationError {
    /// Title empty once trimmed.
    #[error("title must not be blank")]
    BlankTitle,
    /// No non-blank items remained.
    #[error("at least one menu item is required")]
    NoItems,
    /// Expiry window not positive.
    #[error("ttlHours must be positive")]
    NonPositiveTtl,
    /// Price negative or not finite.
    #[error("price must be a non-negative number")]
    InvalidPrice,
}

impl MenuValidationError {
    /// Request field the failure refers to.
    pub const fn field(self) -> &'static str {
        match self {
            Self::BlankTitle => "title",
            Self::NoItems => "items",
            Self::NonPositiveTtl => "ttlHours",
            Self::InvalidPrice => "price",
        }
    }

    /// Machine-readable failure code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::BlankTitle => "blank_title",
            Self::NoItems => "no_items",
            Self::NonPositiveTtl => "non_positive_ttl",
            Self::InvalidPrice => "invalid_price",
        }
    }
}

/// Owner input for a new menu post.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuDraft {
    /// Publishing mess.
    pub mess_id: MessId,
    /// Meal the menu is for.
    pub meal_type: MealType,
    /// Headline.
    pub title: String,
    /// Dishes; blank entries are dropped.
    pub items: Vec<String>,
    /// Whether every dish is vegetarian.
    pub is_veg: bool,
    /// Optional price per plate.
    pub price: Option<f64>,
    /// Hours until expiry.
    pub ttl_hours: i64,
}

impl MenuDraft {
    /// Validate the draft and stamp it as published at `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use mess_backend::domain::{MealType, MenuDraft, MenuPostId, MessId};
    ///
    /// let now = Utc::now();
    /// let draft = MenuDraft {
    ///     mess_id: MessId::random(),
    ///     meal_type: MealType::Lunch,
    ///     title: "Thali".into(),
    ///     items: vec!["Dal".into(), "  ".into(), "Rice".into()],
    ///     is_veg: true,
    ///     price: Some(80.0),
    ///     ttl_hours: 6,
    /// };
    /// let post = draft.into_post(MenuPostId::random(), now).expect("valid draft");
    /// assert_eq!(post.items, vec!["Dal".to_owned(), "Rice".to_owned()]);
    /// assert!(post.is_live(now));
    /// ```
    pub fn into_post(self, id: MenuPostId, now: DateTime<Utc>) -> Result<MenuPost, MenuValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(MenuValidationError::BlankTitle);
        }
        let items: Vec<String> = self
            .items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect();
        if items.is_empty() {
            return Err(MenuValidationError::NoItems);
        }
        if self.ttl_hours <= 0 {
            return Err(MenuValidationError::NonPositiveTtl);
        }
        if let Some(price) = self.price
            && (!price.is_finite() || price < 0.0)
        {
            return Err(MenuValidationError::InvalidPrice);
        }
        let ttl = TimeDelta::try_hours(self.ttl_hours).ok_or(MenuValidationError::NonPositiveTtl)?;
        let expiry_time = now
            .checked_add_signed(ttl)
            .ok_or(MenuValidationError::NonPositiveTtl)?;

        Ok(MenuPost {
            id,
            mess_id: self.mess_id,
            meal_type: self.meal_type,
            title: title.to_owned(),
            items,
            is_veg: self.is_veg,
            price: self.price,
            visible_from: now,
            expiry_time,
            created_at: now,
        })
    }
}

/// Filters for the cross-mess feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    /// Area name to keep; matched exactly after the store query.
    pub area: Option<String>,
    /// Meal to keep.
    pub meal_type: Option<MealType>,
    /// Keep vegetarian posts only.
    pub veg_only: bool,
}

/// A live post joined with its mess and area names.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    /// The post.
    pub post: MenuPost,
    /// Publishing mess name.
    pub mess_name: String,
    /// Area of the mess, if assigned.
    pub area_name: Option<String>,
}

/// A post with its liveness at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuPostView {
    /// The post.
    pub post: MenuPost,
    /// Whether it was live when read.
    pub live: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn draft() -> MenuDraft {
        MenuDraft {
            mess_id: MessId::random(),
            meal_type: MealType::Dinner,
            title: "  Sunday special ".into(),
            items: vec!["Paneer".into(), "Roti".into()],
            is_veg: true,
            price: None,
            ttl_hours: DEFAULT_MENU_TTL_HOURS,
        }
    }

    #[rstest]
    fn publishes_with_expiry_after_ttl(now: DateTime<Utc>, draft: MenuDraft) {
        let post = draft
            .into_post(MenuPostId::random(), now)
            .expect("valid draft");
        assert_eq!(post.title, "Sunday special");
        assert_eq!(post.visible_from, now);
        assert_eq!(post.expiry_time, now + TimeDelta::hours(6));
    }

    #[rstest]
    #[case::blank_title(|d: &mut MenuDraft| d.title = "   ".into(), MenuValidationError::BlankTitle)]
    #[case::blank_items(|d: &mut MenuDraft| d.items = vec![" ".into(), String::new()], MenuValidationError::NoItems)]
    #[case::zero_ttl(|d: &mut MenuDraft| d.ttl_hours = 0, MenuValidationError::NonPositiveTtl)]
    #[case::negative_price(|d: &mut MenuDraft| d.price = Some(-1.0), MenuValidationError::InvalidPrice)]
    #[case::nan_price(|d: &mut MenuDraft| d.price = Some(f64::NAN), MenuValidationError::InvalidPrice)]
    fn rejects_invalid_drafts(
        now: DateTime<Utc>,
        mut draft: MenuDraft,
        #[case] mutate: fn(&mut MenuDraft),
        #[case] expected: MenuValidationError,
    ) {
        mutate(&mut draft);
        let err = draft
            .into_post(MenuPostId::random(), now)
            .expect_err("invalid draft");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn post_is_not_live_at_or_after_expiry(now: DateTime<Utc>, draft: MenuDraft) {
        let post = draft
            .into_post(MenuPostId::random(), now - TimeDelta::hours(7))
            .expect("valid draft");
        assert!(!post.is_live(now));
        assert!(!post.is_live(post.expiry_time));
        assert!(post.is_live(post.expiry_time - TimeDelta::seconds(1)));
    }
}
