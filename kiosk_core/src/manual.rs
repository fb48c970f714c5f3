/*!

This is the long-form manual for `kiosk_core` and the `teampower` program.

## Variants

Two kiosks share the same core, selected with [`Capabilities`](crate::Capabilities):

* `full`: the facilitator picks the language, the industry, the country and
  optionally a product on the setup screen. The results are protected by a
  PIN and can be exported as a text file.
* `reduced`: the facilitator only picks the language, which opens the voting
  screen right away. The results are shown as soon as they are requested.

## Screens

### Setup / language

The start control stays disabled until a language is selected and, on the
full kiosk, an industry and a country. The product is optional:

| selection            | product in the report            |
|----------------------|----------------------------------|
| none                 | (left out)                       |
| a product of the list| the label of that product        |
| custom, with text    | the text, trimmed                |
| custom, blank        | `Custom`                         |

Selecting a language switches the texts immediately. The event information
is frozen when voting starts.

### Voting

Each tap on one of the five buttons adds one vote:

| value | German             | English              |
|-------|--------------------|----------------------|
| -1    | Gesunken           | Decreased            |
| 0     | Gleich geblieben   | Stayed the same      |
| 1     | Leicht gestiegen   | Slightly increased   |
| 2     | Mittel gestiegen   | Moderately increased |
| 3     | Stark gestiegen    | Strongly increased   |

After an accepted vote the buttons are dimmed for 0.7 seconds and taps are
ignored. Participants are not identified: the pause only keeps a double tap
from counting twice.

The control ending the vote is enabled after the first vote. On the full
kiosk it opens a PIN dialog. A wrong PIN shows a message for 3 seconds and
the dialog stays open; there is no limit on the number of attempts. The PIN
is compiled into the kiosk and visible to anyone inspecting it: it prevents
accidental reveals, not determined ones.

### Results

For each category: the number of votes and its share of the total, rounded
to one decimal place. On the full kiosk the results can be downloaded as a
text file named after the date, for example
`Teampower_Results_10-19-2026.txt` or `Teamkraft_Ergebnis_19-10-2026.txt`.

"New voting" resets everything, including the language (back to German).

## Session scripts

The `teampower` program replays a session described in JSON:

```text
{
  "variant": "full",
  "startedAt": "2026-10-19T14:05:00",
  "outputDirectory": "out",
  "actions": [
    { "atMs": 0,    "action": "selectLanguage", "language": "en" },
    { "atMs": 10,   "action": "selectIndustry", "value": "Automotive" },
    { "atMs": 20,   "action": "selectCountry",  "value": "Germany" },
    { "atMs": 50,   "action": "start" },
    { "atMs": 1000, "action": "vote", "category": 1 },
    { "atMs": 5000, "action": "reveal" },
    { "atMs": 5100, "action": "submitPin", "value": "313" },
    { "atMs": 5200, "action": "download" }
  ]
}
```

`atMs` is the time of the action in milliseconds after `startedAt`. The
other actions are `selectProduct` (`value`: empty for none, `custom`, or a
product label), `setCustomProduct`, `pinDigit` (`value`: one character),
`cancelPin`, `reset` and `print`.

 */
