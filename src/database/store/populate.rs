//! Content seeded by the initial upgrade step

use crate::database::core::Populator;
use crate::database::error::Result;
use crate::database::store::phrases::{NewPhrase, PhraseRepository};
use crate::database::store::rest_actions::RestActionRepository;
use rusqlite::Connection;
use tracing::info;

const SETUP_PHRASES: &[NewPhrase<'static>] = &[
    NewPhrase {
        title: "In, out",
        ib_phrase: "Breathing in, I know I am breathing in",
        ob_phrase: "Breathing out, I know I am breathing out",
        ib_short_phrase: "in",
        ob_short_phrase: "out",
    },
    NewPhrase {
        title: "Aware of my body",
        ib_phrase: "Breathing in, I am aware of my body",
        ob_phrase: "Breathing out, I relax my body",
        ib_short_phrase: "aware of body",
        ob_short_phrase: "relaxing body",
    },
];

const SETUP_REST_ACTIONS: &[&str] = &[
    "Stretch your arms and shoulders",
    "Walk around for a few minutes",
    "Drink a glass of water",
];

const TEST_PHRASE_COUNT: usize = 3;
const TEST_REST_ACTION_COUNT: usize = 2;

/// Built-in population hooks
///
/// Setup data is the content a new user starts with. Test data is a small,
/// deterministic fixture set for automated runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPopulator;

impl Populator for DefaultPopulator {
    fn populate_test_data(&self, conn: &Connection) -> Result<()> {
        let phrases = PhraseRepository::new(conn);
        for i in 1..=TEST_PHRASE_COUNT {
            let title = format!("Test phrase {}", i);
            let ib = format!("Breathing in {}", i);
            let ob = format!("Breathing out {}", i);
            phrases.insert(&NewPhrase {
                title: &title,
                ib_phrase: &ib,
                ob_phrase: &ob,
                ib_short_phrase: "",
                ob_short_phrase: "",
            })?;
        }

        let actions = RestActionRepository::new(conn);
        for i in 1..=TEST_REST_ACTION_COUNT {
            actions.insert(&format!("Test rest action {}", i), "")?;
        }

        info!(
            "Populated store with {} test phrases and {} test rest actions",
            TEST_PHRASE_COUNT, TEST_REST_ACTION_COUNT
        );
        Ok(())
    }

    fn populate_setup_data(&self, conn: &Connection) -> Result<()> {
        let phrases = PhraseRepository::new(conn);
        for phrase in SETUP_PHRASES {
            phrases.insert(phrase)?;
        }

        let actions = RestActionRepository::new(conn);
        for title in SETUP_REST_ACTIONS {
            actions.insert(title, "")?;
        }

        info!("Populated store with first-run content");
        Ok(())
    }
}
