//! Stock directory contents: eight conversations with profiles and message
//! history. Seeded once at startup; ids 1..=21 are taken, the store counter
//! continues from 22.

use crate::message::{Direction, Message, MessageBody, MessageId};
use crate::profile::{GroupMember, Profile, ProfileKind};
use crate::store::ConversationStore;

pub(crate) fn store() -> ConversationStore {
    let mut store = ConversationStore::new();
    let mut next_id = 1;
    for (profile, messages) in conversations() {
        let messages = messages
            .into_iter()
            .map(|(direction, content, timestamp)| {
                let id = MessageId(next_id);
                next_id += 1;
                Message {
                    id,
                    direction,
                    body: MessageBody::Text(content.to_owned()),
                    timestamp: timestamp.to_owned(),
                    reply_to: None,
                }
            })
            .collect();
        store.push_seeded(profile, messages);
    }
    store.set_next_id(next_id);
    store
}

type SeedMessage = (Direction, &'static str, &'static str);

fn conversations() -> Vec<(Profile, Vec<SeedMessage>)> {
    use Direction::{Received, Sent};
    vec![
        (
            individual(
                "John Doe",
                "JD",
                ("#ff6b6b", "#feca57"),
                "Online",
                true,
                "Entrepreneur | Coffee lover ☕ | Tech enthusiast",
                "+1 (555) 123-4567",
            ),
            vec![
                (Received, "Hey! How are you doing today? 😊", "2:30 PM"),
                (
                    Sent,
                    "I'm doing great! Just working on some new projects. How about you?",
                    "2:32 PM",
                ),
                (
                    Received,
                    "That sounds awesome! I'd love to hear more about your projects sometime. 🚀",
                    "2:33 PM",
                ),
                (Sent, "Let's catch up over coffee this weekend? ☕", "2:35 PM"),
                (
                    Received,
                    "Perfect! Saturday works for me. Looking forward to it! 🎉",
                    "2:36 PM",
                ),
            ],
        ),
        (
            individual(
                "Sarah Wilson",
                "SW",
                ("#e74c3c", "#f39c12"),
                "Last seen today at 1:45 PM",
                false,
                "Designer by day, artist by night 🎨",
                "+1 (555) 987-6543",
            ),
            vec![
                (Received, "Thanks for the help earlier!", "1:45 PM"),
                (Sent, "No problem at all! Happy to help anytime.", "1:46 PM"),
                (Received, "You are the best! 🙌", "1:47 PM"),
            ],
        ),
        (
            group(
                "Team Group",
                "TG",
                ("#9b59b6", "#3498db"),
                "5 members",
                "Our awesome development team workspace. Let's build amazing things together! 🚀",
                5,
                vec![
                    member("John Doe", "JD", ("#ff6b6b", "#feca57"), "Online", true),
                    member(
                        "Sarah Wilson",
                        "SW",
                        ("#e74c3c", "#f39c12"),
                        "Last seen 2 hours ago",
                        false,
                    ),
                    member("Mike Chen", "MC", ("#2ecc71", "#27ae60"), "Online", false),
                    member(
                        "Alice Johnson",
                        "AJ",
                        ("#1abc9c", "#16a085"),
                        "Last seen yesterday",
                        false,
                    ),
                    member("You", "ME", ("#25d366", "#128c7e"), "Online", true),
                ],
            ),
            vec![
                (Received, "Mike: Let's schedule the meeting", "12:30 PM"),
                (Received, "Alice: What time works for everyone?", "12:31 PM"),
                (Sent, "I'm free after 2 PM today", "12:32 PM"),
            ],
        ),
        (
            individual(
                "Alex Johnson",
                "AJ",
                ("#1abc9c", "#16a085"),
                "Last seen yesterday at 11:20 PM",
                false,
                "Travel blogger | Nature lover 🌲",
                "+1 (555) 456-7890",
            ),
            vec![
                (Sent, "See you tomorrow at the conference!", "Yesterday"),
                (Received, "Perfect! See you tomorrow 👍", "Yesterday"),
            ],
        ),
        (
            individual(
                "Emma Davis",
                "ED",
                ("#f1c40f", "#f39c12"),
                "Last seen 2 days ago",
                false,
                "Marketing specialist | Yoga enthusiast 🧘‍♀️",
                "+1 (555) 234-5678",
            ),
            vec![
                (Received, "Can you send me the documents?", "2 days ago"),
                (Sent, "Sure, I'll email them to you shortly.", "2 days ago"),
            ],
        ),
        (
            group(
                "Family Group",
                "FG",
                ("#e67e22", "#d35400"),
                "8 members",
                "Our loving family group ❤️ Stay connected and share precious moments!",
                8,
                vec![
                    member("Mom", "M", ("#e74c3c", "#c0392b"), "Online", true),
                    member("Dad", "D", ("#3498db", "#2980b9"), "Last seen 1 hour ago", true),
                    member("Sister", "S", ("#9b59b6", "#8e44ad"), "Online", false),
                    member(
                        "Brother",
                        "B",
                        ("#f39c12", "#e67e22"),
                        "Last seen 30 minutes ago",
                        false,
                    ),
                    member("You", "ME", ("#25d366", "#128c7e"), "Online", false),
                ],
            ),
            vec![
                (Received, "Mom: Don't forget dinner on Sunday!", "3 days ago"),
                (Sent, "Of course! Looking forward to it 🍽️", "3 days ago"),
            ],
        ),
        (
            individual(
                "Mike Chen",
                "MC",
                ("#2ecc71", "#27ae60"),
                "Last seen 5 hours ago",
                false,
                "Software developer | Gamer 🎮",
                "+1 (555) 345-6789",
            ),
            vec![
                (Received, "Great work on the presentation!", "10:15 AM"),
                (Sent, "Thank you! Glad it went well.", "10:16 AM"),
            ],
        ),
        (
            individual(
                "Lisa Park",
                "LP",
                ("#8e44ad", "#9b59b6"),
                "Online",
                true,
                "Graphic designer | Creative soul ✨",
                "+1 (555) 567-8901",
            ),
            vec![
                (Received, "Let's catch up soon! 🎨", "9:45 AM"),
                (Sent, "Absolutely! How about this weekend?", "9:46 AM"),
            ],
        ),
    ]
}

fn individual(
    name: &str,
    initials: &str,
    gradient: (&str, &str),
    status: &str,
    online: bool,
    about: &str,
    phone: &str,
) -> Profile {
    Profile {
        display_name: name.to_owned(),
        avatar_initials: initials.to_owned(),
        gradient: (gradient.0.to_owned(), gradient.1.to_owned()),
        status: status.to_owned(),
        online,
        kind: ProfileKind::Individual {
            about: Some(about.to_owned()),
            phone: Some(phone.to_owned()),
        },
    }
}

fn group(
    name: &str,
    initials: &str,
    gradient: (&str, &str),
    status: &str,
    description: &str,
    member_count: usize,
    members: Vec<GroupMember>,
) -> Profile {
    Profile {
        display_name: name.to_owned(),
        avatar_initials: initials.to_owned(),
        gradient: (gradient.0.to_owned(), gradient.1.to_owned()),
        status: status.to_owned(),
        online: false,
        kind: ProfileKind::Group {
            description: description.to_owned(),
            member_count,
            members,
        },
    }
}

fn member(
    name: &str,
    initials: &str,
    gradient: (&str, &str),
    status: &str,
    admin: bool,
) -> GroupMember {
    GroupMember {
        name: name.to_owned(),
        initials: initials.to_owned(),
        gradient: (gradient.0.to_owned(), gradient.1.to_owned()),
        status: status.to_owned(),
        admin,
    }
}
