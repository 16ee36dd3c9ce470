//! Built-in contacts used to seed a fresh address book.
//!
//! Ids are generated on every call, so two calls never share records. Once a
//! store has written its seed to disk, the persisted ids are the ones that
//! stick.

use crate::model::Contact;

const SEED: &[(&str, &str, &str, &str)] = &[
    (
        "Daniel Carlo",
        "Abalos",
        "daniel.abalos@iacademy.ph",
        "https://i.postimg.cc/dtc5qy1k/daniel-carlo-abalos.jpg",
    ),
    (
        "Darth",
        "Vader",
        "darth.vader@iacademy.ph",
        "https://i.postimg.cc/RFnXBGT6/Star-Wars-Darth-Vader.jpg",
    ),
    (
        "Doctor Stephen",
        "Strange",
        "dr.strange@iacademy.edu.ph",
        "https://i.postimg.cc/9MVrmQdd/140222-Dr-S-02.jpg",
    ),
    (
        "Gus",
        "Fring",
        "gus.fring@iacademy.edu.ph",
        "https://i.postimg.cc/FRTBYnkP/Gus-Fring-2002.jpg",
    ),
    (
        "Mitch",
        "Andaya",
        "mitch.andaya@iacademy.edu.ph",
        "https://i.postimg.cc/15ckN51C/image.webp",
    ),
    (
        "Peter",
        "Parker",
        "peter.parker@iacademy.edu.ph",
        "https://i.postimg.cc/YS6cC3xV/spiderman.png",
    ),
    (
        "Walter",
        "White",
        "walter.white@iacademy.edu.ph",
        "https://i.postimg.cc/rs8qkbXQ/Walter-White-S5-B.png",
    ),
    (
        "Winnie",
        "The Pooh",
        "w.pooh@iacademy.edu.ph",
        "https://i.postimg.cc/hjBvMthJ/Pooh.png",
    ),
    (
        "Yui",
        "Hirasawa",
        "yui.hirasawa@iacademy.ph",
        "https://i.postimg.cc/MHyfsg05/Yui-Hirasawa-new-mugshot.png",
    ),
];

const SEED_PHONE: &str = "09123456789";

pub fn default_contacts() -> Vec<Contact> {
    SEED.iter()
        .map(|(first, last, email, avatar)| {
            Contact::new(*first, *last, *email, SEED_PHONE, Some(avatar.to_string()))
        })
        .collect()
}
