use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    NotStarted,
    InProgress,
    Completed,
    TurnedIn,
}

/// Kill-count quest. Transitions that don't apply to the current status are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Quest {
    id: String,
    title: String,
    kill_target: u32,
    kills: u32,
    status: QuestStatus,
}

impl Quest {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kill_target: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kill_target,
            kills: 0,
            status: QuestStatus::NotStarted,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kill_target(&self) -> u32 {
        self.kill_target
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn status(&self) -> QuestStatus {
        self.status
    }

    pub fn start(&mut self) -> bool {
        if self.status != QuestStatus::NotStarted {
            return false;
        }
        self.status = QuestStatus::InProgress;
        true
    }

    pub fn on_kill(&mut self) {
        if self.status != QuestStatus::InProgress {
            return;
        }
        self.kills = self.kills.saturating_add(1);
        if self.kills >= self.kill_target {
            self.status = QuestStatus::Completed;
        }
    }

    pub fn turn_in(&mut self) -> bool {
        if self.status != QuestStatus::Completed {
            return false;
        }
        self.status = QuestStatus::TurnedIn;
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestLog {
    quests: Vec<Quest>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the quest and tracks it. A quest id already in the log is ignored.
    pub fn accept(&mut self, mut quest: Quest) -> bool {
        if self.find(quest.id()).is_some() {
            return false;
        }
        quest.start();
        info!(quest = quest.id(), target = quest.kill_target(), "quest_started");
        self.quests.push(quest);
        true
    }

    pub fn on_enemy_killed(&mut self) {
        for quest in &mut self.quests {
            let was_completed = quest.status() == QuestStatus::Completed;
            quest.on_kill();
            if !was_completed && quest.status() == QuestStatus::Completed {
                info!(quest = quest.id(), kills = quest.kills(), "quest_completed");
            }
        }
    }

    pub fn turn_in(&mut self, id: &str) -> bool {
        self.quests
            .iter_mut()
            .find(|quest| quest.id() == id)
            .is_some_and(Quest::turn_in)
    }

    pub fn find(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|quest| quest.id() == id)
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kill_quest_walks_through_all_states() {
        let mut quest = Quest::new("q1", "title", 3);
        assert_eq!(quest.status(), QuestStatus::NotStarted);

        assert!(quest.start());
        assert_eq!(quest.status(), QuestStatus::InProgress);

        quest.on_kill();
        quest.on_kill();
        assert_eq!(quest.status(), QuestStatus::InProgress);
        quest.on_kill();
        assert_eq!(quest.status(), QuestStatus::Completed);

        quest.on_kill();
        assert_eq!(quest.kills(), 3);
        assert_eq!(quest.status(), QuestStatus::Completed);

        assert!(quest.turn_in());
        assert_eq!(quest.status(), QuestStatus::TurnedIn);
    }

    #[test]
    fn invalid_transitions_are_ignored() {
        let mut quest = Quest::new("q1", "title", 1);
        quest.on_kill();
        assert_eq!(quest.kills(), 0);
        assert!(!quest.turn_in());
        assert_eq!(quest.status(), QuestStatus::NotStarted);

        quest.start();
        assert!(!quest.turn_in());
        assert!(!quest.start());
        assert_eq!(quest.status(), QuestStatus::InProgress);
    }

    #[test]
    fn quest_log_forwards_kills_and_turns_in() {
        let mut log = QuestLog::new();
        assert!(log.accept(Quest::new("wolves", "Cull the pack", 2)));
        assert!(!log.accept(Quest::new("wolves", "duplicate", 9)));

        log.on_enemy_killed();
        assert!(!log.turn_in("wolves"));
        log.on_enemy_killed();
        assert!(log.turn_in("wolves"));
        assert_eq!(
            log.find("wolves").map(Quest::status),
            Some(QuestStatus::TurnedIn)
        );
        assert!(!log.turn_in("missing"));
    }
}
