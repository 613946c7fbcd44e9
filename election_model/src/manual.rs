/*!

This is the long-form manual for `election_model` and the `elecon` console.

## Storage layout

The console keeps three JSON values, each under a fixed key:

* `organizations` an array of organizations
* `elections` an array of elections
* `currentOrganization` a single organization, the one currently selected

With the `elecon` binary every key is a file `<key>.json` inside the data
directory (`.elecon` by default). Values are always written whole.

### Organizations

```json
{
  "id": "1718000000000",
  "name": "Gabon 2024",
  "type": "territorial",
  "description": "Presidential and local elections",
  "userId": "current-user",
  "createdAt": "2024-06-10T06:13:20Z"
}
```

`type` is `territorial` or `professional`. `description` is optional.

### Elections

```json
{
  "id": 1718000000500,
  "title": "Municipales 2024",
  "date": "2024-08-26",
  "status": "upcoming",
  "statusColor": "blue",
  "description": "District of Moanda, 1er Arrondissement",
  "voters": 15240,
  "candidates": 2,
  "centers": 12,
  "bureaux": 48,
  "location": "Moanda, 1er Arrondissement",
  "type": "municipal",
  "seatsAvailable": 1,
  "voteGoal": 5000,
  "organizationId": "1718000000000",
  "organizationType": "territorial",
  "province": "Haut-Ogooue",
  "department": "Lemboumbi-Leyou",
  "commune": "Moanda",
  "arrondissement": "1er Arrondissement",
  "candidatesList": [
    {"id": "1718000000100", "name": "Jean Ndong", "party": "PDG", "isOurCandidate": true}
  ],
  "isActive": true
}
```

`organizationType` selects the scope fields: `province`, `department`,
`commune`, `arrondissement` for territorial elections, `company`,
`direction`, `service` for professional ones. An election may also carry a
`votingLocations` array; the infrastructure counts are then derived from it
instead of `centers` and `bureaux`.

Records written by earlier versions of the console may lack
`organizationType`: they are read as professional when `company` or
`direction` is filled, territorial otherwise. A missing `organizationId`
reads as empty, and such an election belongs to no organization.

Status labels written by earlier versions of the console (`À venir`,
`En cours`, `Terminée`) are read as `upcoming`, `ongoing` and `finished`.

## Rules kept by the console

* Within one organization, at most one election is active. Adding an election
  or activating one rewrites the whole collection at once.
* Within one election, at most one candidate is flagged as the
  organization's own candidate. The last one flagged wins.

## Consolidated views

The consolidated views are computed from the election record alone, through
the ratios of `ConsolidationRatios`:

| figure | default |
|---|---|
| turnout | 67.7% of voters |
| null ballots | 2.5% of voters |
| valid ballots | 65.2% of voters |
| centers completed | 93% of centers |
| first listed candidate | 42.8% of valid ballots |
| second listed candidate | 35.7% of valid ballots |
| other candidates | 21.5% split evenly |
| zones 1, 2, 3 | 40%, 35%, 25% of voters, turnout 69.1%, 66.8%, 67.6% |
| results entered | 85% of bureaux |
| pending reports | 15% of bureaux |

These are placeholders: no submitted tally reaches the console. All the
figures are floors of exact integer products.

With exactly two candidates the "other candidates" share is not assigned to
anyone, so the percentages add up to 78.5%.

*/
