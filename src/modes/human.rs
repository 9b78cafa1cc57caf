use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{DirectionState, GameConfig, GameEngine, GameState, MoveCommandQueue};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive keyboard play in the terminal
///
/// Key presses are only ever queued; the tick loop drains at most one
/// command per tick so several quick presses between ticks are applied in
/// order instead of the last one winning.
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    heading: DirectionState,
    commands: MoveCommandQueue,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Self {
            engine,
            state,
            heading: DirectionState::default(),
            commands: MoveCommandQueue::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // 8 Hz game ticks
        let mut tick_timer = interval(Duration::from_millis(125));

        // ~30 FPS redraw
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Ignore key release and repeat events
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(dir) => self.commands.enqueue(dir),
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// One game tick: drain a command, apply it, advance the board
    fn update_game(&mut self) {
        if !self.state.is_alive() {
            return;
        }

        let requested = self.commands.dequeue(self.heading.current());
        self.heading.transition(requested);

        let status = self.engine.step(&mut self.state, self.heading.current());

        if status.is_terminal() {
            self.metrics.on_game_over(status, self.state.score);
        }
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.heading = DirectionState::default();
        self.commands.clear();
        self.metrics.on_game_start();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, StepStatus};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> HumanMode {
        let mut mode = HumanMode::new(GameConfig::new(10, 10));
        // Keep food out of the way of the scripted moves
        mode.state.food = Position::new(0, 9);
        mode
    }

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default());
        assert!(mode.state.is_alive());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.heading.current(), Direction::Right);
    }

    #[test]
    fn test_keys_only_queue_commands() {
        let mut mode = mode();
        let head = mode.state.snake.head();

        mode.handle_event(key(KeyCode::Up));
        mode.handle_event(key(KeyCode::Left));

        assert_eq!(mode.commands.len(), 2);
        assert_eq!(mode.state.snake.head(), head);
        assert_eq!(mode.heading.current(), Direction::Right);
    }

    #[test]
    fn test_quick_presses_apply_one_per_tick() {
        let mut mode = mode();
        let start = mode.state.snake.head();

        mode.handle_event(key(KeyCode::Up));
        mode.handle_event(key(KeyCode::Left));

        mode.update_game();
        assert_eq!(mode.heading.current(), Direction::Up);
        assert_eq!(mode.state.snake.head(), start.moved_by(0, -1));

        mode.update_game();
        assert_eq!(mode.heading.current(), Direction::Left);
        assert_eq!(mode.state.snake.head(), start.moved_by(-1, -1));
    }

    #[test]
    fn test_reversal_press_is_ignored() {
        let mut mode = mode();
        let start = mode.state.snake.head();

        mode.handle_event(key(KeyCode::Left));
        mode.update_game();

        assert_eq!(mode.heading.current(), Direction::Right);
        assert_eq!(mode.state.snake.head(), start.moved_by(1, 0));
    }

    #[test]
    fn test_game_over_recorded() {
        let mut mode = mode();
        for _ in 0..10 {
            mode.update_game();
        }

        assert_eq!(mode.state.status, StepStatus::WallCollision);
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = mode();
        mode.state.score = 10;
        mode.state.status = StepStatus::SelfCollision;
        mode.handle_event(key(KeyCode::Up));
        mode.update_game();

        mode.handle_event(key(KeyCode::Char('r')));

        assert_eq!(mode.state.score, 0);
        assert!(mode.state.is_alive());
        assert!(mode.commands.is_empty());
        assert_eq!(mode.heading.current(), Direction::Right);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
