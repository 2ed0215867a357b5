use domain::review::{ReviewFilter, ReviewSort};
use domain::Id;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub(crate) const DEFAULT_PAGE: u64 = 1;
pub(crate) const DEFAULT_LIMIT: u64 = 10;

/// Sort orders a client may request on review listings.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SortParam {
    #[default]
    Newest,
    Oldest,
    HighestRating,
    LowestRating,
}

impl From<SortParam> for ReviewSort {
    fn from(sort: SortParam) -> Self {
        match sort {
            SortParam::Newest => ReviewSort::Newest,
            SortParam::Oldest => ReviewSort::Oldest,
            SortParam::HighestRating => ReviewSort::HighestRating,
            SortParam::LowestRating => ReviewSort::LowestRating,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) movie_id: Option<Id>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) user_id: Option<Id>,
    pub(crate) page: Option<u64>,
    pub(crate) limit: Option<u64>,
    pub(crate) sort: Option<SortParam>,
}

impl IndexParams {
    pub(crate) fn filter(&self) -> ReviewFilter {
        ReviewFilter {
            movie_id: self.movie_id,
            user_id: self.user_id,
        }
    }

    pub(crate) fn sort(&self) -> ReviewSort {
        self.sort.unwrap_or_default().into()
    }

    pub(crate) fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub(crate) fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Body for creating a review. There is deliberately no rating field: the
/// rating is derived from the text by the sentiment classifier.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    #[schema(value_type = Uuid)]
    pub(crate) movie_id: Id,
    pub(crate) movie_title: String,
    pub(crate) review_text: String,
}

/// Body for updating a review. Omitted fields keep their stored value;
/// clients cannot touch the derived rating, sentiment or score directly.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) movie_title: Option<String>,
    pub(crate) review_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_params_deserialize_from_snake_case() {
        let sort: SortParam = serde_json::from_str("\"highest_rating\"").unwrap();
        assert!(matches!(sort, SortParam::HighestRating));
    }

    #[test]
    fn index_params_default_to_first_page_newest_first() {
        let params = IndexParams {
            movie_id: None,
            user_id: None,
            page: None,
            limit: None,
            sort: None,
        };

        assert_eq!(params.page(), DEFAULT_PAGE);
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert_eq!(params.sort(), ReviewSort::Newest);
    }
}
