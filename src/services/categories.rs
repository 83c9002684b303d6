use chrono::NaiveDateTime;

use crate::domain::category::Category;
use crate::domain::post::Post;
use crate::domain::types::CategorySlug;
use crate::pagination::{Paginated, Pagination};
use crate::repository::{CategoryReader, PostListQuery, PostReader};
use crate::services::errors::log_repo_error;

use super::{ServiceError, ServiceResult};

/// Category page: the category itself plus its visible posts, newest first.
///
/// An unpublished category is reported as absent, the same as an unknown
/// slug.
pub fn show_category<R>(
    slug: &CategorySlug,
    page: usize,
    per_page: usize,
    now: NaiveDateTime,
    repo: &R,
) -> ServiceResult<(Category, Paginated<Post>)>
where
    R: CategoryReader + PostReader,
{
    let category = repo
        .get_category_by_slug(slug)
        .map_err(|e| log_repo_error("Failed to get category", e))?
        .ok_or(ServiceError::NotFound)?;

    if !category.is_published {
        return Err(ServiceError::NotFound);
    }

    let pagination = Pagination::new(page, per_page);
    let query = PostListQuery::new()
        .category(slug.clone())
        .published(now)
        .with_related()
        .with_comment_count()
        .paginate(page, per_page);

    let (total, posts) = repo
        .list_posts(query)
        .map_err(|e| log_repo_error("Failed to list category posts", e))?;

    Ok((category, Paginated::from_page(posts, &pagination, total)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;
    use crate::services::test_fixtures::{sample_category, sample_post, ts};

    fn slug(value: &str) -> CategorySlug {
        CategorySlug::new(value).unwrap()
    }

    #[test]
    fn unknown_slug_is_not_found() {
        let repo = TestRepository::new();
        let err = show_category(&slug("travel"), 1, 10, ts(0), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn unpublished_category_is_not_found() {
        let repo =
            TestRepository::new().with_categories(vec![sample_category(1, "travel", false)]);
        let err = show_category(&slug("travel"), 1, 10, ts(0), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn category_page_lists_only_its_visible_posts() {
        let mut other = sample_post(2, 1, ts(1_000));
        other.category.as_mut().unwrap().slug = slug("food");

        let repo = TestRepository::new()
            .with_categories(vec![sample_category(1, "travel", true)])
            .with_posts(vec![sample_post(1, 1, ts(1_000)), other]);

        let (category, page) = show_category(&slug("travel"), 1, 10, ts(2_000), &repo).unwrap();
        assert_eq!(category.slug.as_str(), "travel");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, 1);
    }
}
