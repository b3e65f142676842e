use randevu_reminders_infra::RandevuContext;
use std::fmt::Debug;
use tracing::error;

#[async_trait::async_trait]
pub trait UseCase: Debug {
    type Response;
    type Errors;

    async fn execute(&mut self, ctx: &RandevuContext) -> Result<Self::Response, Self::Errors>;
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx))]
pub async fn execute<U>(mut usecase: U, ctx: &RandevuContext) -> Result<U::Response, U::Errors>
where
    U: UseCase,
    U::Errors: Debug,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        error!("Use case error: {:?}", e);
    }

    res
}
