use std::fmt;
use std::sync::Arc;

use super::errors::LoginError;
use super::event::LoginEvent;
use super::hooks::AfterAuthenticateHook;
use super::hooks::BeforeAuthenticateHook;
use super::ports::AuthenticationStrategy;
use super::ports::LoginEventSink;
use super::ports::TokenIssuer;
use super::registry::HookRegistry;

/// Login coordinator for one request flavor.
///
/// Sequences before-hooks, the authentication strategy, after-hooks,
/// token issuance and the login event. It holds no per-call state, so a
/// single instance serves concurrent logins.
pub struct LoginPipeline<R> {
    flavor: &'static str,
    before_hooks: HookRegistry<dyn BeforeAuthenticateHook<R>>,
    after_hooks: HookRegistry<dyn AfterAuthenticateHook<R>>,
    strategy: Arc<dyn AuthenticationStrategy<R>>,
    token_issuer: Arc<dyn TokenIssuer>,
    events: Arc<dyn LoginEventSink>,
}

impl<R: Send + Sync + 'static> LoginPipeline<R> {
    /// Start assembling a pipeline.
    ///
    /// # Arguments
    /// * `flavor` - Label used in logs (e.g. "password", "oauth")
    /// * `strategy` - Verifies requests of this flavor
    /// * `token_issuer` - Mints the token returned to the caller
    /// * `events` - Receives the login event
    pub fn builder(
        flavor: &'static str,
        strategy: Arc<dyn AuthenticationStrategy<R>>,
        token_issuer: Arc<dyn TokenIssuer>,
        events: Arc<dyn LoginEventSink>,
    ) -> LoginPipelineBuilder<R> {
        LoginPipelineBuilder {
            pipeline: Self {
                flavor,
                before_hooks: HookRegistry::new(),
                after_hooks: HookRegistry::new(),
                strategy,
                token_issuer,
                events,
            },
        }
    }

    pub fn flavor(&self) -> &'static str {
        self.flavor
    }

    /// Hooks run before the strategy. Changes apply to subsequent logins.
    pub fn before_hooks(&self) -> &HookRegistry<dyn BeforeAuthenticateHook<R>> {
        &self.before_hooks
    }

    /// Hooks run after the strategy. Changes apply to subsequent logins.
    pub fn after_hooks(&self) -> &HookRegistry<dyn AfterAuthenticateHook<R>> {
        &self.after_hooks
    }

    /// Authenticate `request` and return a session token.
    ///
    /// # Errors
    /// Whatever a before-hook, the strategy or the token issuer returned,
    /// unchanged. Nothing after the failing step runs.
    pub async fn authenticate(&self, request: &R) -> Result<String, LoginError> {
        for entry in self.before_hooks.snapshot() {
            tracing::debug!(flavor = self.flavor, hook = %entry.name, "Running before-authenticate hook");

            if let Err(e) = entry.hook.before_authenticate(request).await {
                tracing::warn!(
                    flavor = self.flavor,
                    hook = %entry.name,
                    error = %e,
                    "Login aborted by before-authenticate hook"
                );
                return Err(e);
            }
        }

        let user = match self.strategy.authenticate(request).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(flavor = self.flavor, error = %e, "Authentication failed");
                return Err(e);
            }
        };

        for entry in self.after_hooks.snapshot() {
            tracing::debug!(
                flavor = self.flavor,
                hook = %entry.name,
                user_id = %user.user_id,
                "Running after-authenticate hook"
            );
            entry.hook.after_authenticate(&user).await;
        }

        let token = self.token_issuer.create_token(&user).await?;

        if let Err(e) = self.events.publish(LoginEvent::succeeded(&user)) {
            tracing::error!(
                "Failed to publish login event for user {}: {}",
                user.user_id,
                e
            );
        }

        tracing::info!(
            flavor = self.flavor,
            user_id = %user.user_id,
            grant_type = %user.grant_type,
            "Login succeeded"
        );

        Ok(token)
    }
}

impl<R> fmt::Debug for LoginPipeline<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginPipeline")
            .field("flavor", &self.flavor)
            .field("before_hooks", &self.before_hooks)
            .field("after_hooks", &self.after_hooks)
            .finish_non_exhaustive()
    }
}

/// Registers hooks before the pipeline is shared.
pub struct LoginPipelineBuilder<R> {
    pipeline: LoginPipeline<R>,
}

impl<R: Send + Sync + 'static> LoginPipelineBuilder<R> {
    pub fn before(
        self,
        name: impl Into<String>,
        priority: i32,
        hook: Arc<dyn BeforeAuthenticateHook<R>>,
    ) -> Self {
        self.pipeline.before_hooks.register(name, priority, hook);
        self
    }

    pub fn after(
        self,
        name: impl Into<String>,
        priority: i32,
        hook: Arc<dyn AfterAuthenticateHook<R>>,
    ) -> Self {
        self.pipeline.after_hooks.register(name, priority, hook);
        self
    }

    pub fn build(self) -> LoginPipeline<R> {
        self.pipeline
    }
}
