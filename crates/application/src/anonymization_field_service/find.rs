use super::*;

impl AnonymizationFieldService {
    /// Lists one page of anonymization fields in the caller's namespace.
    pub async fn find(
        &self,
        actor: &UserIdentity,
        query: AnonymizationFieldFindQuery,
    ) -> AppResult<AnonymizationFieldPage> {
        if query.page == 0 {
            return Err(AppError::Validation("page must be at least 1".to_owned()));
        }

        if query.per_page == 0 || query.per_page > MAX_FIND_PER_PAGE {
            return Err(AppError::Validation(format!(
                "per_page must be between 1 and {MAX_FIND_PER_PAGE}"
            )));
        }

        self.repository.find(actor.namespace(), &query).await
    }
}
