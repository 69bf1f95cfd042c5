use classcue_config::{AttendanceConfig, CorsConfig, JwtConfig, RateLimitConfig};
use classcue_db::{init_db_pool, run_migrations};
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub attendance_config: AttendanceConfig,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool().await?;
    run_migrations(&db).await?;

    Ok(AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        attendance_config: AttendanceConfig::from_env(),
    })
}
