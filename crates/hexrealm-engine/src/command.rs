//! The closed set of commands the engine accepts.

use hexrealm_city::domain::commands::FoundCity;
use hexrealm_core::command::Command;
use hexrealm_diplomacy::domain::commands::{
    AcceptDiplomacy, DeclineDiplomacy, EndDiplomacy, ProposeDiplomacy,
};
use hexrealm_game::domain::commands::{
    CreateGame, CreatePlayer, EndTurn, GenerateMap, JoinGame, StartGame,
};
use hexrealm_technology::domain::commands::{
    CreateTechnologyTree, DiscoverTechnology, GrantSciencePoints,
};
use hexrealm_unit::domain::commands::{AttackUnit, CreateUnit, DestroyUnit, MoveUnit};
use hexrealm_visibility::domain::commands::UpdateVisibility;
use uuid::Uuid;

macro_rules! game_commands {
    ($($variant:ident),+ $(,)?) => {
        /// Any command of any bounded context.
        #[derive(Debug, Clone)]
        pub enum GameCommand {
            $($variant($variant),)+
        }

        impl GameCommand {
            fn inner(&self) -> &dyn Command {
                match self {
                    $(Self::$variant(command) => command,)+
                }
            }
        }

        $(
            impl From<$variant> for GameCommand {
                fn from(command: $variant) -> Self {
                    Self::$variant(command)
                }
            }
        )+
    };
}

game_commands!(
    CreateGame,
    JoinGame,
    StartGame,
    EndTurn,
    GenerateMap,
    CreatePlayer,
    FoundCity,
    CreateUnit,
    MoveUnit,
    AttackUnit,
    DestroyUnit,
    CreateTechnologyTree,
    GrantSciencePoints,
    DiscoverTechnology,
    ProposeDiplomacy,
    AcceptDiplomacy,
    DeclineDiplomacy,
    EndDiplomacy,
    UpdateVisibility,
);

impl Command for GameCommand {
    fn command_type(&self) -> &'static str {
        self.inner().command_type()
    }

    fn correlation_id(&self) -> Uuid {
        self.inner().correlation_id()
    }

    fn target_stream(&self) -> Uuid {
        self.inner().target_stream()
    }
}
