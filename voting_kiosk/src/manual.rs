/*!

This is the operator manual for `vkiosk`, the console front-end of `voting_kiosk`.

## Running the kiosk

```bash
vkiosk --config kiosk.json --state-dir /var/lib/vkiosk --out-dir exports
```

All the flags are optional. Without `--config`, the kiosk uses the five
demonstration parties (ADC, APC, LP, NNPP, PDP) and ten demonstration voters.
The tally is stored in `<state-dir>/<storage key>.json` and reloaded at the
next start. If this file is missing or cannot be read, a new election starts.

## Configuration

```json
{
  "storageKey": "evoting.portal.v1",
  "candidates": [
    { "id": "candidate1", "name": "ADC", "logo": "/ADC logo.jpeg" },
    { "id": "candidate2", "name": "APC", "logo": "/APC.jpg" }
  ],
  "credentials": [
    { "username": "1234567890", "passcode": "1990-01-01" }
  ]
}
```

Candidate ids must be unique, and candidate names must not contain commas
since they are written as-is in the CSV export. Changing the candidates of an
existing election makes the stored tally unusable: the kiosk will start a new
one.

## Commands

| command                        | effect                                                      |
|--------------------------------|-------------------------------------------------------------|
| `login <identifier> <secret>`  | authenticates a voter and unlocks the ballot                |
| `vote <candidate id>`          | records a vote and locks the kiosk                          |
| `void`                         | records a void ballot and locks the kiosk                   |
| `end` / `reopen`               | stops or resumes accepting ballots                          |
| `reset`                        | erases everything, after answering `yes` to the confirmation |
| `export`                       | writes `election_tally_<YYYY-MM-DD>.csv` in the output directory |
| `results` / `status`           | shows the tally, or the state of the kiosk                  |
| `quit`                         | leaves the console                                          |

Each credential can be used once. Ending the voting does not prevent voters
from authenticating, but their ballot is only accepted once the voting is
reopened. Reopening does not give back the credentials already used.

With `--reference <file>`, every export is compared to the given CSV file and the
differences are printed.

*/
