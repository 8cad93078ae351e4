mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{InputAction, InputSource, InputState, ScriptedInput};
pub use loop_runner::{
    plan_tick, CancelToken, GameTime, LoopClock, LoopConfig, LoopExitReason, LoopSummary,
    Scheduler, SystemClock, TickPlan, Updatable, MAX_TICK_DELTA, MIN_TICK_DELTA,
};
pub use rendering::{NullRenderer, Renderer};
pub use scene::{Scene, SceneManager, Vec2, Vec3};
